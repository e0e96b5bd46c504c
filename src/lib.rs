//! Print-ready SVG sheets for electrical panel labels.
//!
//! Rows of sized units go in, a multi-page document comes out:
//!
//! ```no_run
//! use panelabel::{DirectoryResolver, GlobalSettings, Renderer, Unit};
//!
//! let mut renderer = Renderer::new(GlobalSettings::default(), DirectoryResolver::new("icons"))?;
//! let rows = vec![vec![Unit::default().with_logo("oven").with_description("Oven")]];
//! let svg = renderer.render_document(&rows);
//! # Ok::<(), panelabel::SettingsError>(())
//! ```

pub mod cli;
pub mod compose;
pub mod error;
pub mod export;
pub mod fonts;
pub mod geometry;
pub mod icon;
pub mod layout;
pub mod marks;
pub mod render;
pub mod session;
pub mod settings;
pub mod svg;
pub mod text;
pub mod unit;
pub mod xml;

pub use error::{ExportError, InputError, SettingsError};
pub use icon::{
    BUILTIN_ICONS, CachedResolver, DirectoryResolver, IconError, IconRef, IconResolver,
    MemoryResolver,
};
pub use layout::{Line, Page, Placement, plan_layout};
pub use render::Renderer;
pub use session::Session;
pub use settings::GlobalSettings;
pub use unit::{Row, Unit};
