//! Output markup schemas for the marklet compiler.
//!
//! A [`Schema`] describes one output language (HTML, JavaScript, ...): which
//! elements exist, how each is serialized ([`ElementFlag`]), which attributes
//! it accepts ([`AttributeValidator`]) and which document types it may
//! declare ([`DocType`]). Schemas are read-only while templates compile.
//!
//! Schemas are built with the fluent [`SchemaBuilder`], deserialized from
//! JSON with [`Schema::from_json_str`], or taken from [`builtin`].

pub mod builder;
pub mod builtin;
pub mod doctype;
pub mod error;
pub mod schema;
pub mod validator;

pub use builder::{ElementBuilder, SchemaBuilder};
pub use doctype::DocType;
pub use error::SchemaError;
pub use schema::{ContentFamily, Schema, SchemaRef};
pub use validator::{AttributeFlag, AttributeValidator, ElementFlag, ElementValidator};
