use crux_core::capability::{CapabilityContext, Operation};
use serde::{Deserialize, Serialize};

/// Writes to the root presentation context, e.g. `<html data-theme="dark">`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "op", content = "data")]
pub enum AppearanceOperation {
    SetRootAttribute { name: String, value: String },
}

impl Operation for AppearanceOperation {
    type Output = ();
}

#[derive(crux_core::macros::Capability)]
pub struct Appearance<Ev> {
    context: CapabilityContext<AppearanceOperation, Ev>,
}

impl<Ev> Appearance<Ev> {
    pub fn new(context: CapabilityContext<AppearanceOperation, Ev>) -> Self {
        Self { context }
    }
}

impl<Ev> Appearance<Ev>
where
    Ev: Send + 'static,
{
    pub fn set_root_attribute(&self, name: impl Into<String>, value: impl Into<String>) {
        let operation = AppearanceOperation::SetRootAttribute {
            name: name.into(),
            value: value.into(),
        };
        let ctx = self.context.clone();
        self.context.spawn(async move {
            ctx.notify_shell(operation).await;
        });
    }
}
