//! The two intake wizards of the site and their page scaffolding.

pub mod client;
pub mod worker;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::config::Config;
use crate::errors::StepperError;
use crate::surface::Document;
use crate::wizard::WizardConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowKind {
    Client,
    Worker,
}

impl FlowKind {
    pub const ALL: [FlowKind; 2] = [FlowKind::Client, FlowKind::Worker];

    pub fn mount_id(self) -> &'static str {
        match self {
            FlowKind::Client => client::MOUNT_ID,
            FlowKind::Worker => worker::MOUNT_ID,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            FlowKind::Client => "Solicitud de confección",
            FlowKind::Worker => "Postulación",
        }
    }

    /// Flow configuration with the submission timeout taken from `settings`.
    pub fn config(self, settings: &Config) -> Result<WizardConfig, StepperError> {
        let builder = match self {
            FlowKind::Client => client::builder(),
            FlowKind::Worker => worker::builder(),
        };
        builder.submit_timeout(settings.submit_timeout()).build()
    }

    /// Initial position of the flow's range control.
    pub fn amount_default(self) -> (&'static str, &'static str) {
        match self {
            FlowKind::Client => (client::BUDGET_ID, client::BUDGET_DEFAULT),
            FlowKind::Worker => (worker::SALARY_ID, worker::SALARY_DEFAULT),
        }
    }

    /// Adds the flow's mount and sections to `document` and seeds its
    /// range control.
    pub fn scaffold(self, document: &mut Document, config: &WizardConfig) {
        document.scaffold(config);
        let (id, value) = self.amount_default();
        document.inputs_mut().set_text(id, value);
    }
}

impl fmt::Display for FlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowKind::Client => write!(f, "client"),
            FlowKind::Worker => write!(f, "worker"),
        }
    }
}

impl FromStr for FlowKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "client" | "cliente" => Ok(FlowKind::Client),
            "worker" | "postulante" => Ok(FlowKind::Worker),
            other => Err(format!("unknown flow `{other}` (expected client or worker)")),
        }
    }
}
