/// Domain layer - pure EOL tracking logic with no I/O
pub mod domain;
pub mod policies;
pub mod services;
