mod controls;
mod details;
mod minimap;
mod panels;
