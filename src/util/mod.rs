pub mod http;
pub mod text;
pub mod xml;
