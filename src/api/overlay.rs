//! OBS browser-source page. Transparent background, polls `/stats` every second.

pub const OVERLAY_HTML: &str = include_str!("overlay.html");
