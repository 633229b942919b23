use crux_core::capability::{CapabilityContext, Operation};
use serde::{Deserialize, Serialize};

/// Every place the header can send the user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Home,
    CreatePin,
    Profile,
}

impl Route {
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::CreatePin => "/createPin",
            Self::Profile => "/profile",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NavigateOperation {
    pub path: String,
}

impl NavigateOperation {
    #[must_use]
    pub fn to(route: Route) -> Self {
        Self {
            path: route.path().to_owned(),
        }
    }
}

impl Operation for NavigateOperation {
    type Output = ();
}

/// Client-side router push.
#[derive(crux_core::macros::Capability)]
pub struct Navigate<Ev> {
    context: CapabilityContext<NavigateOperation, Ev>,
}

impl<Ev> Navigate<Ev> {
    pub fn new(context: CapabilityContext<NavigateOperation, Ev>) -> Self {
        Self { context }
    }
}

impl<Ev> Navigate<Ev>
where
    Ev: Send + 'static,
{
    pub fn to(&self, route: Route) {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            ctx.notify_shell(NavigateOperation::to(route)).await;
        });
    }
}
