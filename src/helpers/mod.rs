pub mod aggregate;
pub mod api;
pub mod chart;
pub mod html;
pub mod output;
