//! Traefik 1.x annotated Ingress -> Traefik 2.x Ingress + Middleware

pub mod annotations;
pub mod codec;
pub mod convert;
pub mod directives;
pub mod error;
pub mod legacy;
pub mod list;
pub mod manifest;
pub mod middleware;
pub mod name;
pub mod request_modifier;
pub mod rule_type;
pub mod walk;

pub use self::convert::{Conversion, Converter};
pub use self::error::ConvertError;
pub use self::walk::convert_path;
