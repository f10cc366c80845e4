mod cart;
mod clock;
mod expense;
mod menu;
mod money;
mod order;

pub use cart::*;
pub use clock::*;
pub use expense::*;
pub use menu::*;
pub use money::*;
pub use order::*;
