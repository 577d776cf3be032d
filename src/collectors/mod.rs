pub mod onewire;
