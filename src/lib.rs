//! Renders a single-page portfolio: a navbar, a fan of images and a
//! portrait that unfurls the fan into a list.

pub mod config;
pub mod dom;
pub mod engine;
pub mod output;
pub mod site;
pub mod util;
