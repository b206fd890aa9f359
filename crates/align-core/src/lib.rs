mod background;
mod capability;
mod collection;
mod config;
mod document;
mod error;
mod event;
mod format;
pub mod headless;
mod layout;
mod markup;
mod observe;
mod section;
mod settings;
mod styler;
mod toolbar;
mod value;

pub use crate::background::*;
pub use crate::capability::*;
pub use crate::collection::*;
pub use crate::config::*;
pub use crate::document::Document;
pub use crate::error::*;
pub use crate::event::*;
pub use crate::format::*;
pub use crate::layout::*;
pub use crate::observe::*;
pub use crate::section::*;
pub use crate::settings::*;
pub use crate::styler::*;
pub use crate::toolbar::{SectionStateView, SectionToolbar};
pub use crate::value::*;
