pub mod dashboard;
pub mod mindmap;
pub mod notifications;
pub mod theme;
