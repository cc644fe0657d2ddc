pub mod frame;
pub mod header;
pub mod parser;
pub mod registry;
pub mod synch;
pub mod tag;
pub mod text;
pub mod v1;
pub mod writer;
