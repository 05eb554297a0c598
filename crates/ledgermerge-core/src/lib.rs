pub mod error;
pub mod schema;
pub mod mapping;
pub mod normalize;
pub mod numeric;
pub mod identifiers;
pub mod unify;
pub mod filters;
pub mod pipeline;
pub mod summary;
