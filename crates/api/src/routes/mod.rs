pub mod astro;
pub mod health;
