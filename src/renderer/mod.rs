pub mod colours;
pub mod drawing;
pub mod fonts;
pub mod overlay;
