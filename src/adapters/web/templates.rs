//! HTML templates using Askama.

use askama::Template;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate<'a> {
    pub title: &'a str,
    /// Value of the file input's `accept` attribute.
    pub accept: String,
    pub min_years: u32,
    pub max_years: u32,
    pub default_years: u32,
    pub required_columns: String,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate<'a> {
    pub title: &'a str,
    pub message: &'a str,
}
