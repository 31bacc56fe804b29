pub mod locales;
pub mod pages;
