pub mod document;
pub mod frontmatter;
