//! Infinitely looping carousel.
//!
//! | Module | Role |
//! |--------|------|
//! | `engine` | index/position state machine, clone slots, rendering |
//! | `gesture` | pure drag transition function |
//! | `autoplay` | hover/pause-aware clock fed with elapsed time |
//! | `slides` | slide items and the news, gallery and photo renderers |
//! | `driver` | tokio task owning a live carousel and its timers |

pub mod autoplay;
pub mod driver;
pub mod engine;
pub mod gesture;
pub mod slides;

pub use driver::{CarouselHandle, CarouselInput, CarouselSnapshot};
pub use engine::{Carousel, CarouselBuilder, CarouselOptions, Direction, SlideRenderer};
pub use gesture::{DragEffect, DragState, PointerEvent, SwipeIntent};
pub use slides::{GallerySlides, NewsSlides, PhotoSlides, SlideItem};
