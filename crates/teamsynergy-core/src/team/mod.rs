// Team state: members, the six-slot roster, and the persistent manager.

pub mod manager;
pub mod member;
pub mod roster;
