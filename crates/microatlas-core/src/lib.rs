pub mod error;
pub mod consts;
pub mod config;
pub mod view;
pub mod navigation;
pub mod appearance;
pub mod histogram;
pub mod scale;
pub mod hover;
pub mod loader;
pub mod viewer;
pub mod embed;
