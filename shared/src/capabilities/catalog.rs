use crux_core::capability::{CapabilityContext, Operation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum CatalogOperation {
    ListThemes,
}

impl Operation for CatalogOperation {
    type Output = Vec<String>;
}

/// Source of the selectable theme names, in display order.
#[derive(crux_core::macros::Capability)]
pub struct Catalog<Ev> {
    context: CapabilityContext<CatalogOperation, Ev>,
}

impl<Ev> Catalog<Ev> {
    pub fn new(context: CapabilityContext<CatalogOperation, Ev>) -> Self {
        Self { context }
    }
}

impl<Ev> Catalog<Ev>
where
    Ev: Send + 'static,
{
    pub fn list_themes<F>(&self, make_event: F)
    where
        F: FnOnce(Vec<String>) -> Ev + Send + 'static,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let themes = ctx.request_from_shell(CatalogOperation::ListThemes).await;
            ctx.update_app(make_event(themes));
        });
    }
}
