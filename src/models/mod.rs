pub mod admin;
pub mod content_block;
pub mod event;
pub mod need;
pub mod news;
pub mod page;
pub mod parishioner;
pub mod post;
pub mod servant;
pub mod service;
pub mod session;

use lazy_static::lazy_static;
use regex::Regex;

pub use admin::{Admin, AdminCredentials, AdminInput, AdminUpdate};
pub use content_block::{ContentBlock, ContentBlockInput, ContentBlockQuery};
pub use event::{Event, EventInput};
pub use need::{Need, NeedInput};
pub use news::{News, NewsInput};
pub use page::{Page, PageInput, PageWithBlocks};
pub use parishioner::{Parishioner, ParishionerInput};
pub use post::{Post, PostInput};
pub use servant::{Servant, ServantInput};
pub use service::{Service, ServiceInput};
pub use session::SessionToken;

lazy_static! {
    // Administrator logins: letters, digits, dots, underscores, hyphens
    pub static ref LOGIN_REGEX: Regex = Regex::new(r"^[A-Za-z0-9._-]+$").unwrap();
    // URL slugs and public identifiers: lowercase words joined by hyphens
    pub static ref SLUG_REGEX: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();
}
