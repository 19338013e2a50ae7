//! PDF composition module for transparency groups and graphics states.
//!
//! This module provides the pieces a drawing layer needs to build
//! transparency groups, soft masks, opacity and blend mode states, and
//! axial shading patterns on top of an existing document writer.
//!
//! ## Architecture
//!
//! ```text
//! drawing primitives
//!     ↓ write / prepend
//! [Composer] (OperatorSink: page or innermost open group)
//!     ↓                          ↓
//! [GroupStack]              [GraphicsStateRegistry]
//!     ↓                          ↓
//! [ObjectTable] (numbered indirect objects, group content streams)
//!     ↓
//! [ObjectSerializer] (dictionary syntax)
//!     ↓
//! ComposedDocument → document writer
//! ```
//!
//! ## Grouping
//!
//! ```
//! use pdf_compose::writer::{
//!     CompositeOperation, Composer, GroupOptions, OperatorSink, PageDimensions,
//! };
//!
//! let mut composer = Composer::with_page(PageDimensions::new(612.0, 792.0));
//! let group = composer.open_group(GroupOptions::named("G1"))?;
//! composer.write("0 0 1 rg 10 10 50 50 re f");
//! composer.close_group()?;
//! composer.draw_group(&group, CompositeOperation::SourceOver)?;
//!
//! assert_eq!(composer.page_content(0).unwrap(), ["/G1 Do"]);
//! # Ok::<(), pdf_compose::Error>(())
//! ```

mod composer;
mod content_sink;
mod graphics_state;
mod group_stack;
mod object_serializer;
mod object_table;
mod pattern;
mod resources;

pub use composer::{ComposedDocument, Composer, PageContent, PageDimensions};
pub use content_sink::{Destination, OperatorSink};
pub use graphics_state::{
    blend_mode_name, opacity_name, soft_mask_name, BlendMode, ExtGStateBuilder,
    GraphicsStateRegistry, SoftMask, SoftMaskSubtype,
};
pub use group_stack::{CanvasState, CompositeOperation, Group, GroupOptions, GroupRef, GroupStack};
pub use object_serializer::{to_dictionary_syntax, ObjectSerializer};
pub use object_table::{IndirectObject, ObjectKind, ObjectTable};
pub use pattern::{pattern_name, AxialShadingPattern};
pub use resources::{ResourceDictionary, ResourceKind, ResourceScope};
