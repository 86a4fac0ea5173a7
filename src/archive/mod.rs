//! Container-level views of map files: the header, the lump directory, and what each lump slot
//! means.

pub mod bsp;
