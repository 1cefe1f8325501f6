#![allow(dead_code)]

use async_trait::async_trait;
use jobhawk_automation::selectors::*;
use jobhawk_browser::{BrowserDriver, ElementState, Error, Locator, Result};
use jobhawk_core::{RawSettings, SessionCookie, Settings};
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

pub const BASE: &str = "https://www.linkedin.com";

/// Cookie the fake site treats as a logged-in session
pub const SESSION_COOKIE: &str = "li_at";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FakeElement {
    Field(&'static str),
    Button(&'static str),
    Card { page: usize, index: usize },
    Badge,
    TitleLink { page: usize, index: usize },
    LoginError,
}

#[derive(Debug, Clone)]
pub struct FakeCard {
    pub badge: bool,
    pub href: Option<String>,
    /// Title link lookup raises a driver error
    pub broken_link: bool,
}

impl FakeCard {
    pub fn easy_apply(href: &str) -> Self {
        Self {
            badge: true,
            href: Some(href.to_string()),
            broken_link: false,
        }
    }

    pub fn regular(href: &str) -> Self {
        Self {
            badge: false,
            href: Some(href.to_string()),
            broken_link: false,
        }
    }

    pub fn broken() -> Self {
        Self {
            badge: true,
            href: None,
            broken_link: true,
        }
    }

    pub fn without_href() -> Self {
        Self {
            badge: true,
            href: None,
            broken_link: false,
        }
    }
}

/// Where the browser ends up after the sign-in button is clicked
#[derive(Debug, Clone)]
pub enum LoginResult {
    Redirect(String),
    Stay,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Navigated(String),
    Refreshed,
    Cleared(&'static str),
    Typed(&'static str, String),
    PressedEnter(&'static str),
    Clicked(&'static str),
    CookieAdded(String),
    Quit,
}

#[derive(Debug)]
pub struct SiteState {
    pub url: String,
    pub cookies: Vec<SessionCookie>,
    pub refused_cookies: HashSet<String>,
    pub login_form: bool,
    pub login_result: LoginResult,
    pub login_error: Option<String>,
    pub search_box: bool,
    pub filter_button: bool,
    pub filter_applied: bool,
    pub searched: bool,
    pub pages: Vec<Vec<FakeCard>>,
    pub current_page: usize,
    /// The next button stays clickable on the last page
    pub looping_next: bool,
    /// Elements rendered but not accepting input, by locator name
    pub disabled: HashSet<&'static str>,
    pub actions: Vec<Action>,
}

/// Scripted stand-in for the job site behind a browser
pub struct FakeSite {
    state: Mutex<SiteState>,
}

impl FakeSite {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SiteState {
                url: "about:blank".to_string(),
                cookies: vec![],
                refused_cookies: HashSet::new(),
                login_form: true,
                login_result: LoginResult::Redirect(format!("{}/feed/", BASE)),
                login_error: None,
                search_box: true,
                filter_button: true,
                filter_applied: false,
                searched: false,
                pages: vec![],
                current_page: 0,
                looping_next: false,
                disabled: HashSet::new(),
                actions: vec![],
            }),
        }
    }

    pub fn with_pages(self, pages: Vec<Vec<FakeCard>>) -> Self {
        self.state().pages = pages;
        self
    }

    pub fn configure(self, f: impl FnOnce(&mut SiteState)) -> Self {
        f(&mut self.state());
        self
    }

    pub fn state(&self) -> MutexGuard<'_, SiteState> {
        self.state.lock().unwrap()
    }

    pub fn actions(&self) -> Vec<Action> {
        self.state().actions.clone()
    }

    fn on_jobs_page(state: &SiteState) -> bool {
        state.url.contains("/jobs")
    }

    fn on_login_page(state: &SiteState) -> bool {
        state.url.contains("/login")
    }

    fn field_name(locator: &Locator) -> &'static str {
        locator.name
    }
}

fn element_name(element: &FakeElement) -> &'static str {
    match element {
        FakeElement::Field(name) | FakeElement::Button(name) => *name,
        FakeElement::Card { .. } => "card",
        FakeElement::Badge => "badge",
        FakeElement::TitleLink { .. } => "title link",
        FakeElement::LoginError => "login error",
    }
}

#[async_trait]
impl BrowserDriver for FakeSite {
    type Element = FakeElement;

    async fn navigate(&self, url: &str) -> Result<()> {
        let mut state = self.state();
        state.actions.push(Action::Navigated(url.to_string()));

        state.url = if url.ends_with("/feed") {
            if state.cookies.iter().any(|c| c.name == SESSION_COOKIE) {
                format!("{}/feed/", BASE)
            } else {
                format!("{}/authwall?trk=feed", BASE)
            }
        } else {
            url.to_string()
        };
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.state().url.clone())
    }

    async fn refresh(&self) -> Result<()> {
        self.state().actions.push(Action::Refreshed);
        Ok(())
    }

    async fn find_all(&self, locator: &Locator) -> Result<Vec<FakeElement>> {
        let state = self.state();
        let login = Self::on_login_page(&state);
        let jobs = Self::on_jobs_page(&state);

        let found = if *locator == USERNAME_INPUT || *locator == PASSWORD_INPUT {
            if login && state.login_form {
                vec![FakeElement::Field(Self::field_name(locator))]
            } else {
                vec![]
            }
        } else if *locator == LOGIN_BUTTON {
            if login && state.login_form {
                vec![FakeElement::Button(LOGIN_BUTTON.name)]
            } else {
                vec![]
            }
        } else if *locator == LOGIN_ERROR {
            if login && state.login_error.is_some() {
                vec![FakeElement::LoginError]
            } else {
                vec![]
            }
        } else if *locator == KEYWORD_INPUT || *locator == LOCATION_INPUT {
            if jobs && state.search_box {
                vec![FakeElement::Field(Self::field_name(locator))]
            } else {
                vec![]
            }
        } else if *locator == EASY_APPLY_FILTER {
            if jobs && state.searched && state.filter_button {
                vec![FakeElement::Button(EASY_APPLY_FILTER.name)]
            } else {
                vec![]
            }
        } else if *locator == JOB_CARDS {
            match state.pages.get(state.current_page) {
                Some(cards) if state.searched => (0..cards.len())
                    .map(|index| FakeElement::Card {
                        page: state.current_page,
                        index,
                    })
                    .collect(),
                _ => vec![],
            }
        } else if *locator == NEXT_PAGE_BUTTON {
            let has_next = state.current_page + 1 < state.pages.len() || state.looping_next;
            if state.searched && has_next {
                vec![FakeElement::Button(NEXT_PAGE_BUTTON.name)]
            } else {
                vec![]
            }
        } else {
            vec![]
        };

        Ok(found)
    }

    async fn find_all_within(
        &self,
        parent: &FakeElement,
        locator: &Locator,
    ) -> Result<Vec<FakeElement>> {
        let state = self.state();
        let FakeElement::Card { page, index } = parent else {
            return Ok(vec![]);
        };
        let card = state
            .pages
            .get(*page)
            .and_then(|cards| cards.get(*index))
            .ok_or_else(|| Error::Lookup("stale card".to_string()))?;

        if *locator == EASY_APPLY_BADGE {
            Ok(if card.badge { vec![FakeElement::Badge] } else { vec![] })
        } else if *locator == JOB_TITLE_LINK {
            if card.broken_link {
                Err(Error::Lookup("node detached from document".to_string()))
            } else {
                Ok(vec![FakeElement::TitleLink {
                    page: *page,
                    index: *index,
                }])
            }
        } else {
            Ok(vec![])
        }
    }

    async fn element_state(&self, element: &FakeElement) -> Result<ElementState> {
        Ok(ElementState {
            visible: true,
            enabled: !self.state().disabled.contains(element_name(element)),
        })
    }

    async fn click(&self, element: &FakeElement) -> Result<()> {
        let mut state = self.state();
        let name = element_name(element);
        state.actions.push(Action::Clicked(name));

        if name == LOGIN_BUTTON.name {
            if let LoginResult::Redirect(target) = state.login_result.clone() {
                state.url = target;
            }
        } else if name == EASY_APPLY_FILTER.name {
            state.filter_applied = true;
        } else if name == NEXT_PAGE_BUTTON.name {
            if state.current_page + 1 < state.pages.len() {
                state.current_page += 1;
            }
        }
        Ok(())
    }

    async fn clear(&self, element: &FakeElement) -> Result<()> {
        self.state().actions.push(Action::Cleared(element_name(element)));
        Ok(())
    }

    async fn type_text(&self, element: &FakeElement, text: &str) -> Result<()> {
        self.state()
            .actions
            .push(Action::Typed(element_name(element), text.to_string()));
        Ok(())
    }

    async fn press_enter(&self, element: &FakeElement) -> Result<()> {
        let mut state = self.state();
        let name = element_name(element);
        state.actions.push(Action::PressedEnter(name));
        if name == KEYWORD_INPUT.name {
            state.searched = true;
            state.current_page = 0;
        }
        Ok(())
    }

    async fn attribute(&self, element: &FakeElement, name: &str) -> Result<Option<String>> {
        let state = self.state();
        match element {
            FakeElement::TitleLink { page, index } if name == "href" => Ok(state
                .pages
                .get(*page)
                .and_then(|cards| cards.get(*index))
                .and_then(|card| card.href.clone())),
            _ => Ok(None),
        }
    }

    async fn text(&self, element: &FakeElement) -> Result<Option<String>> {
        match element {
            FakeElement::LoginError => Ok(self.state().login_error.clone()),
            _ => Ok(None),
        }
    }

    async fn cookies(&self) -> Result<Vec<SessionCookie>> {
        Ok(self.state().cookies.clone())
    }

    async fn add_cookie(&self, cookie: &SessionCookie) -> Result<()> {
        let mut state = self.state();
        if state.refused_cookies.contains(&cookie.name) {
            return Err(Error::Browser(format!("Malformed cookie '{}'", cookie.name)));
        }
        state.actions.push(Action::CookieAdded(cookie.name.clone()));
        state.cookies.push(cookie.clone());
        Ok(())
    }

    async fn quit(&mut self) -> Result<()> {
        self.state().actions.push(Action::Quit);
        Ok(())
    }
}

pub fn cookie_settings(cookie_file: &std::path::Path) -> Settings {
    Settings::from_raw(RawSettings {
        auth_method: Some("cookie".to_string()),
        cookie_file: Some(cookie_file.display().to_string()),
        ..Default::default()
    })
    .unwrap()
}

pub fn credential_settings() -> Settings {
    Settings::from_raw(RawSettings {
        auth_method: Some("credentials".to_string()),
        username: Some("someone@example.com".to_string()),
        password: Some("hunter2".to_string()),
        ..Default::default()
    })
    .unwrap()
}

pub fn search_settings(keywords: &str, location: &str) -> Settings {
    Settings::from_raw(RawSettings {
        keywords: Some(keywords.to_string()),
        location: Some(location.to_string()),
        ..Default::default()
    })
    .unwrap()
}

/// Write a session file holding the given JSON
pub fn write_session(dir: &tempfile::TempDir, json: &str) -> std::path::PathBuf {
    let path = dir.path().join("cookie.json");
    std::fs::write(&path, json).unwrap();
    path
}

pub fn job_url(id: u32) -> String {
    format!("{}/jobs/view/{}/", BASE, id)
}
