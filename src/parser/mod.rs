//! Front-ends producing the shared documentation model.
//!
//! Two alternative extraction strategies exist: [`scan`] reads `---` doc
//! comments straight from Lua sources, [`luals`] reshapes the JSON
//! documentation export of lua-language-server. Both converge on
//! [`crate::model::Module`] and the choice between them is made once at
//! startup.

pub mod luals;
pub mod scan;
