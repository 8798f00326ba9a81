pub mod card;
pub mod events;
pub mod record;
pub mod status;
