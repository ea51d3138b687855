pub mod ansi_renderer;
pub mod html_renderer;
pub mod plain_renderer;
pub mod renderer_factory;
