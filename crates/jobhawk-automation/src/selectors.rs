//! Element locators for the job site's login and job search pages.

use jobhawk_browser::Locator;

pub const USERNAME_INPUT: Locator = Locator::css("username field", "#username");
pub const PASSWORD_INPUT: Locator = Locator::css("password field", "#password");
pub const LOGIN_BUTTON: Locator = Locator::css("sign-in button", "button[type='submit']");
pub const LOGIN_ERROR: Locator = Locator::css("login error message", "#error-for-username");

pub const KEYWORD_INPUT: Locator =
    Locator::css("keyword search box", "input[aria-label*='Search by title']");
pub const LOCATION_INPUT: Locator =
    Locator::css("location search box", "input[aria-label*='City, state, or zip']");

pub const EASY_APPLY_FILTER: Locator =
    Locator::css("Easy Apply filter", "button[aria-label='Easy Apply filter.']");

pub const JOB_CARDS: Locator = Locator::css("job cards", "div[class*='job-card-container']");
pub const JOB_TITLE_LINK: Locator = Locator::css("job title link", "a[class*='job-card-list__title']");
pub const EASY_APPLY_BADGE: Locator = Locator::css("Easy Apply badge", "span").containing_text("Easy Apply");

pub const NEXT_PAGE_BUTTON: Locator =
    Locator::css("next page button", "button[aria-label='View next page']");
