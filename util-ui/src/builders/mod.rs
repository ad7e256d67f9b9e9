mod tag_builder;

pub use tag_builder::TagBuilder;
