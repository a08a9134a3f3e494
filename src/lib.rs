pub mod config;
pub mod demo;
pub mod dialog;
pub mod ui;
pub mod util;

pub use config::Config;
pub use dialog::{
    ActionDescriptor, DialogDefaults, DialogError, DialogProvider, DialogRequest, DismissalKey,
    Dismisser, RequestBroker, SupersedePolicy,
};
pub use ui::{App, DialogLayer};
