pub mod io;
pub mod varint;
