use std::time::Duration;

use api_types::user::Credentials;
use chrono_tz::Tz;
use crossterm::event::{self, Event, KeyEventKind};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use uuid::Uuid;

use crate::{
    client::Client,
    config::AppConfig,
    error::{AppError, Result},
    ui::{self, keymap::AppAction},
};

pub mod accounts;
pub mod budget;
pub mod categories;
mod dispatch;
pub mod form;
pub mod groups;
pub mod requests;
pub mod screen;
pub mod transactions;

use accounts::Accounts;
use budget::BudgetModel;
use categories::Categories;
use form::Lookups;
use groups::Groups;
use requests::{ApiCall, ApiEvent, ApiResult, Kind, Request, RequestTracker, Target};
use screen::{Mode, ScreenModel};
use transactions::Transactions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Main,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Nav,
    Main,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Budget,
    Categories,
    Groups,
    Accounts,
    Transactions,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Self::Budget,
        Self::Categories,
        Self::Groups,
        Self::Accounts,
        Self::Transactions,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Budget => "Budget",
            Self::Categories => "Categories",
            Self::Groups => "Category Groups",
            Self::Accounts => "Accounts",
            Self::Transactions => "Transactions",
        }
    }

    fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|section| *section == self)
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Username,
    Password,
}

#[derive(Debug)]
pub struct LoginState {
    pub username: String,
    pub password: String,
    pub focus: LoginField,
    pub message: Option<String>,
}

pub struct AppState {
    pub screen: Screen,
    pub focus: Focus,
    pub section: Section,
    pub login: LoginState,
    pub budget: BudgetModel,
    pub accounts: ScreenModel<Accounts>,
    pub groups: ScreenModel<Groups>,
    pub categories: ScreenModel<Categories>,
    pub transactions: ScreenModel<Transactions>,
    pub requests: RequestTracker,
    pub timezone: Tz,
    pub user: Option<String>,
    pub should_quit: bool,
    has_token: bool,
    new_token: Option<String>,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        let timezone = config.timezone.parse::<Tz>().unwrap_or_else(|_| {
            tracing::warn!(timezone = %config.timezone, "unknown timezone, using UTC");
            Tz::UTC
        });
        Self {
            screen: Screen::Login,
            focus: Focus::Nav,
            section: Section::Budget,
            login: LoginState {
                username: config.username.clone(),
                password: String::new(),
                focus: if config.username.is_empty() {
                    LoginField::Username
                } else {
                    LoginField::Password
                },
                message: None,
            },
            budget: BudgetModel::default(),
            accounts: ScreenModel::default(),
            groups: ScreenModel::default(),
            categories: ScreenModel::default(),
            transactions: ScreenModel::default(),
            requests: RequestTracker::default(),
            timezone,
            user: None,
            should_quit: false,
            has_token: config.jwt.is_some(),
            new_token: None,
        }
    }

    /// With a pre-issued token the login screen is skipped.
    pub fn start(&mut self) -> Vec<Request> {
        if !self.has_token {
            return Vec::new();
        }
        self.screen = Screen::Main;
        self.load_all()
    }

    /// Token from the latest successful login, handed over once.
    pub fn take_token(&mut self) -> Option<String> {
        self.new_token.take()
    }

    fn issue(&mut self, call: ApiCall) -> Request {
        self.requests.issue(call)
    }

    fn issue_lists(&mut self, targets: &[Target]) -> Vec<Request> {
        targets
            .iter()
            .map(|target| self.issue(ApiCall::List(*target)))
            .collect()
    }

    fn load_all(&mut self) -> Vec<Request> {
        self.issue_lists(&[
            Target::Budget,
            Target::Accounts,
            Target::Groups,
            Target::Categories,
            Target::Transactions,
        ])
    }

    /// Whether the active screen has a text field capturing keys.
    pub fn is_editing(&self) -> bool {
        if self.screen == Screen::Login {
            return true;
        }
        if self.focus == Focus::Nav {
            return false;
        }
        match self.section {
            Section::Budget => false,
            Section::Accounts => self.accounts.is_editing(),
            Section::Groups => self.groups.is_editing(),
            Section::Categories => self.categories.is_editing(),
            Section::Transactions => self.transactions.is_editing(),
        }
    }

    fn active_in_list(&self) -> bool {
        match self.section {
            Section::Budget => self.budget.mode == budget::BudgetMode::List,
            Section::Accounts => matches!(self.accounts.mode, Mode::List),
            Section::Groups => matches!(self.groups.mode, Mode::List),
            Section::Categories => matches!(self.categories.mode, Mode::List),
            Section::Transactions => matches!(self.transactions.mode, Mode::List),
        }
    }

    pub fn handle_action(&mut self, action: AppAction) -> Vec<Request> {
        if action == AppAction::Quit {
            self.should_quit = true;
            return Vec::new();
        }
        match self.screen {
            Screen::Login => self.on_login(action),
            Screen::Main => self.on_main(action),
        }
    }

    fn on_login(&mut self, action: AppAction) -> Vec<Request> {
        let login = &mut self.login;
        let field = match login.focus {
            LoginField::Username => &mut login.username,
            LoginField::Password => &mut login.password,
        };
        match action {
            AppAction::Tab | AppAction::Up | AppAction::Down => {
                login.focus = match login.focus {
                    LoginField::Username => LoginField::Password,
                    LoginField::Password => LoginField::Username,
                };
            }
            AppAction::Input(ch) => field.push(ch),
            AppAction::Backspace => {
                field.pop();
            }
            AppAction::Submit | AppAction::Signup => {
                let username = login.username.trim().to_string();
                if username.is_empty() || login.password.is_empty() {
                    login.message = Some("username and password are required".to_string());
                    return Vec::new();
                }
                let credentials = Credentials {
                    username,
                    password: login.password.clone(),
                };
                login.message = None;
                let call = if action == AppAction::Signup {
                    ApiCall::Signup(credentials)
                } else {
                    ApiCall::Login(credentials)
                };
                return vec![self.issue(call)];
            }
            _ => {}
        }
        Vec::new()
    }

    fn on_main(&mut self, action: AppAction) -> Vec<Request> {
        let editing = self.is_editing();
        match action {
            AppAction::Tab if !editing => {
                self.focus = match self.focus {
                    Focus::Nav => Focus::Main,
                    Focus::Main => Focus::Nav,
                };
                return Vec::new();
            }
            AppAction::Input('q') if !editing => {
                self.should_quit = true;
                return Vec::new();
            }
            _ => {}
        }

        match self.focus {
            Focus::Nav => {
                self.on_nav(action);
                Vec::new()
            }
            Focus::Main => {
                if action == AppAction::Cancel && self.active_in_list() {
                    self.focus = Focus::Nav;
                    return Vec::new();
                }
                self.forward(action)
                    .map(|call| self.issue(call))
                    .into_iter()
                    .collect()
            }
        }
    }

    fn on_nav(&mut self, action: AppAction) {
        let index = self.section.index();
        match action {
            AppAction::Up | AppAction::Input('k') => {
                self.section = Section::ALL[index.saturating_sub(1)];
            }
            AppAction::Down | AppAction::Input('j') => {
                self.section = Section::ALL[(index + 1).min(Section::ALL.len() - 1)];
            }
            AppAction::Submit | AppAction::Right | AppAction::Input('l') => {
                self.focus = Focus::Main;
            }
            _ => {}
        }
    }

    fn forward(&mut self, action: AppAction) -> Option<ApiCall> {
        match self.section {
            Section::Budget => self.budget.handle(action),
            Section::Accounts => self.accounts.handle(action, &Lookups::default()),
            Section::Groups => self.groups.handle(action, &Lookups::default()),
            Section::Categories => {
                let lookups = Lookups {
                    groups: &self.groups.items,
                    ..Lookups::default()
                };
                self.categories.handle(action, &lookups)
            }
            Section::Transactions => {
                let lookups = Lookups {
                    accounts: &self.accounts.items,
                    groups: &self.groups.items,
                    categories: &self.categories.items,
                };
                self.transactions.handle(action, &lookups)
            }
        }
    }

    pub fn handle_api_event(&mut self, event: ApiEvent) -> Vec<Request> {
        let (target, kind) = event.key;
        if !self.requests.accept(event.key, event.token) {
            tracing::debug!(?target, ?kind, token = event.token, "dropping stale result");
            return Vec::new();
        }
        match event.result {
            Ok(result) => self.apply(target, result),
            Err(message) => {
                tracing::debug!(?target, ?kind, error = %message, "request failed");
                self.fail(target, message);
                Vec::new()
            }
        }
    }

    fn fail(&mut self, target: Target, message: String) {
        match target {
            Target::Session => self.login.message = Some(message),
            Target::Budget => self.budget.failed(message),
            Target::Accounts => self.accounts.failed(message),
            Target::Groups => self.groups.failed(message),
            Target::Categories => self.categories.failed(message),
            Target::Transactions => self.transactions.failed(message),
        }
    }

    fn apply(&mut self, target: Target, result: ApiResult) -> Vec<Request> {
        match result {
            ApiResult::LoggedIn(response) => {
                tracing::info!(user = %response.user.username, "logged in");
                self.screen = Screen::Main;
                self.focus = Focus::Nav;
                self.user = Some(response.user.username);
                self.login.password.clear();
                self.login.message = None;
                self.has_token = true;
                self.new_token = Some(response.token);
                return self.load_all();
            }
            ApiResult::Budget(overview) => self.budget.loaded(overview),
            ApiResult::Accounts(items) => self.accounts.loaded(items),
            ApiResult::Groups(items) => self.groups.loaded(items),
            ApiResult::Categories(items) => self.categories.loaded(items),
            ApiResult::Transactions(items) => self.transactions.loaded(items),
            ApiResult::Detail(id, transactions) => match target {
                Target::Accounts => self.accounts.show_detail(id, transactions),
                Target::Categories => self.categories.show_detail(id, transactions),
                _ => {}
            },
            ApiResult::Saved => {
                self.mark_saved(target, None);
                return self.reload_after_mutation(target);
            }
            ApiResult::Deleted(id) => {
                self.mark_saved(target, Some(id));
                return self.reload_after_mutation(target);
            }
        }
        Vec::new()
    }

    fn mark_saved(&mut self, target: Target, deleted: Option<Uuid>) {
        macro_rules! settle {
            ($model:expr) => {
                match deleted {
                    Some(id) => $model.deleted(id),
                    None => $model.saved(),
                }
            };
        }
        match target {
            Target::Accounts => settle!(self.accounts),
            Target::Groups => settle!(self.groups),
            Target::Categories => settle!(self.categories),
            Target::Transactions => settle!(self.transactions),
            Target::Session | Target::Budget => {}
        }
    }

    /// Lists whose contents depend on the mutated resource.
    fn reload_after_mutation(&mut self, target: Target) -> Vec<Request> {
        let targets: &[Target] = match target {
            Target::Accounts => &[Target::Accounts, Target::Transactions, Target::Budget],
            Target::Groups => &[Target::Groups, Target::Categories, Target::Budget],
            Target::Categories => &[Target::Categories, Target::Transactions, Target::Budget],
            Target::Transactions => &[Target::Transactions, Target::Budget],
            Target::Session | Target::Budget => &[],
        };
        self.issue_lists(targets)
    }

    pub fn is_pending(&self, target: Target, kind: Kind) -> bool {
        self.requests.is_pending((target, kind))
    }
}

pub struct App {
    client: Client,
    pub state: AppState,
    events_tx: UnboundedSender<ApiEvent>,
    events_rx: UnboundedReceiver<ApiEvent>,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = Client::new(
            &config.base_url,
            Duration::from_secs(config.timeout_secs),
            config.jwt.clone(),
        )?;
        let state = AppState::new(&config);
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Ok(Self {
            client,
            state,
            events_tx,
            events_rx,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = ui::setup_terminal()?;
        let result = self.event_loop(&mut terminal).await;
        ui::restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(100);

        let initial = self.state.start();
        self.spawn_all(initial);

        while !self.state.should_quit {
            self.drain_events();

            terminal
                .draw(|frame| ui::render(frame, &self.state))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            if event::poll(tick_rate)?
                && let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
            {
                let requests = self.state.handle_action(ui::keymap::map_key(key));
                self.spawn_all(requests);
            }
            tokio::task::yield_now().await;
        }
        Ok(())
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            let follow_up = self.state.handle_api_event(event);
            if let Some(token) = self.state.take_token() {
                self.client.set_token(token);
            }
            self.spawn_all(follow_up);
        }
    }

    fn spawn_all(&self, requests: Vec<Request>) {
        for request in requests {
            self.spawn(request);
        }
    }

    fn spawn(&self, request: Request) {
        let client = self.client.clone();
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            let key = request.call.key();
            let result = dispatch::execute(&client, request.call)
                .await
                .map_err(|err| err.to_string());
            let event = ApiEvent {
                token: request.token,
                key,
                result,
            };
            if events.send(event).is_err() {
                tracing::debug!("event loop closed before result arrived");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use api_types::{
        Money,
        account::{AccountType, AccountView},
        user::{LoginResponse, UserView},
    };
    use chrono::Utc;

    use super::{requests::RequestKey, *};

    fn config(jwt: Option<&str>) -> AppConfig {
        AppConfig {
            username: "ann".to_string(),
            jwt: jwt.map(str::to_string),
            ..AppConfig::default()
        }
    }

    fn account(name: &str) -> AccountView {
        AccountView {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            account_name: name.to_string(),
            account_type: AccountType::Savings,
            balance: Money::new(1_000),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn logged_in() -> AppState {
        let mut state = AppState::new(&config(Some("token")));
        state.start();
        state
    }

    fn complete(state: &mut AppState, request: &Request, result: ApiResult) -> Vec<Request> {
        state.handle_api_event(ApiEvent {
            token: request.token,
            key: request.call.key(),
            result: Ok(result),
        })
    }

    fn press(state: &mut AppState, actions: &[AppAction]) -> Vec<Request> {
        let mut out = Vec::new();
        for action in actions {
            out.extend(state.handle_action(*action));
        }
        out
    }

    fn targets(requests: &[Request]) -> Vec<RequestKey> {
        requests.iter().map(|request| request.call.key()).collect()
    }

    #[test]
    fn q_is_typed_on_login_screen() {
        let mut state = AppState::new(&config(None));
        assert_eq!(state.login.focus, LoginField::Password);
        press(&mut state, &[AppAction::Input('q')]);
        assert!(!state.should_quit);
        assert_eq!(state.login.password, "q");
    }

    #[test]
    fn ctrl_c_always_quits() {
        let mut state = AppState::new(&config(None));
        press(&mut state, &[AppAction::Quit]);
        assert!(state.should_quit);
    }

    #[test]
    fn login_needs_both_fields() {
        let mut state = AppState::new(&config(None));
        let sent = press(&mut state, &[AppAction::Submit]);
        assert!(sent.is_empty());
        assert!(state.login.message.is_some());
    }

    #[test]
    fn successful_login_loads_everything() {
        let mut state = AppState::new(&config(None));
        let sent = press(&mut state, &[AppAction::Input('p'), AppAction::Submit]);
        assert_eq!(sent.len(), 1);
        let login = &sent[0];

        let now = Utc::now();
        let follow_up = complete(
            &mut state,
            login,
            ApiResult::LoggedIn(LoginResponse {
                user: UserView {
                    id: Uuid::new_v4(),
                    username: "ann".to_string(),
                    created_at: now,
                    updated_at: now,
                },
                token: "jwt".to_string(),
            }),
        );
        assert_eq!(state.screen, Screen::Main);
        assert_eq!(state.take_token().as_deref(), Some("jwt"));
        assert!(state.take_token().is_none());
        assert!(state.login.password.is_empty());
        assert_eq!(
            targets(&follow_up),
            [
                (Target::Budget, Kind::List),
                (Target::Accounts, Kind::List),
                (Target::Groups, Kind::List),
                (Target::Categories, Kind::List),
                (Target::Transactions, Kind::List),
            ]
        );
    }

    #[test]
    fn jwt_skips_login() {
        let mut state = AppState::new(&config(Some("token")));
        let sent = state.start();
        assert_eq!(state.screen, Screen::Main);
        assert_eq!(sent.len(), 5);
    }

    #[test]
    fn q_quits_from_lists_but_not_while_editing() {
        let mut state = logged_in();
        state.section = Section::Groups;
        press(
            &mut state,
            &[AppAction::Tab, AppAction::Input('n'), AppAction::Submit],
        );
        assert!(state.is_editing());
        press(&mut state, &[AppAction::Input('q'), AppAction::Tab]);
        assert!(!state.should_quit);
        assert_eq!(state.focus, Focus::Main);
        assert_eq!(state.groups.form().unwrap().fields.name, "q");

        press(&mut state, &[AppAction::Cancel, AppAction::Input('q')]);
        assert!(state.should_quit);
    }

    #[test]
    fn nav_moves_between_sections() {
        let mut state = logged_in();
        press(&mut state, &[AppAction::Up]);
        assert_eq!(state.section, Section::Budget);
        press(&mut state, &[AppAction::Input('j'), AppAction::Down]);
        assert_eq!(state.section, Section::Groups);
        press(&mut state, &[AppAction::Submit]);
        assert_eq!(state.focus, Focus::Main);
        press(&mut state, &[AppAction::Cancel]);
        assert_eq!(state.focus, Focus::Nav);
    }

    #[test]
    fn stale_list_result_is_dropped() {
        let mut state = logged_in();
        let first = state.issue(ApiCall::List(Target::Accounts));
        let second = state.issue(ApiCall::List(Target::Accounts));

        complete(&mut state, &second, ApiResult::Accounts(vec![account("new")]));
        complete(&mut state, &first, ApiResult::Accounts(vec![account("old")]));

        assert_eq!(state.accounts.items.len(), 1);
        assert_eq!(state.accounts.items[0].account_name, "new");
    }

    #[test]
    fn account_enter_fetches_then_shows_details() {
        let mut state = logged_in();
        let initial = state.load_all();
        complete(
            &mut state,
            &initial[1],
            ApiResult::Accounts(vec![account("Checking")]),
        );
        state.section = Section::Accounts;
        state.focus = Focus::Main;

        let sent = press(&mut state, &[AppAction::Submit]);
        assert_eq!(targets(&sent), [(Target::Accounts, Kind::Detail)]);
        assert!(matches!(state.accounts.mode, Mode::List));

        let id = state.accounts.items[0].id;
        complete(&mut state, &sent[0], ApiResult::Detail(id, Vec::new()));
        assert!(matches!(state.accounts.mode, Mode::Details { id: shown } if shown == id));
    }

    #[test]
    fn overlapping_deletes_each_take_effect() {
        let mut state = logged_in();
        let initial = state.load_all();
        complete(
            &mut state,
            &initial[1],
            ApiResult::Accounts(vec![account("A"), account("B")]),
        );
        let a = state.accounts.items[0].id;
        let b = state.accounts.items[1].id;

        let delete_a = state.issue(ApiCall::Delete(Target::Accounts, a));
        let delete_b = state.issue(ApiCall::Delete(Target::Accounts, b));

        let follow_up = complete(&mut state, &delete_a, ApiResult::Deleted(a));
        assert_eq!(
            targets(&follow_up),
            [
                (Target::Accounts, Kind::List),
                (Target::Transactions, Kind::List),
                (Target::Budget, Kind::List),
            ]
        );
        state.handle_api_event(ApiEvent {
            token: delete_b.token,
            key: delete_b.call.key(),
            result: Err("account not found".to_string()),
        });

        let names: Vec<_> = state
            .accounts
            .items
            .iter()
            .map(|account| account.account_name.as_str())
            .collect();
        assert_eq!(names, ["B"]);
        assert_eq!(state.accounts.error.as_deref(), Some("account not found"));
    }

    #[test]
    fn late_detail_does_not_replace_an_open_form() {
        let mut state = logged_in();
        let initial = state.load_all();
        complete(
            &mut state,
            &initial[1],
            ApiResult::Accounts(vec![account("Checking")]),
        );
        state.section = Section::Accounts;
        state.focus = Focus::Main;
        let id = state.accounts.items[0].id;

        let sent = press(&mut state, &[AppAction::Submit]);
        press(
            &mut state,
            &[
                AppAction::Input('n'),
                AppAction::Submit,
                AppAction::Input('S'),
                AppAction::Input('a'),
                AppAction::Input('v'),
            ],
        );
        complete(&mut state, &sent[0], ApiResult::Detail(id, Vec::new()));

        assert!(matches!(state.accounts.mode, Mode::FormNew(_)));
        assert_eq!(state.accounts.form().unwrap().fields.name, "Sav");
    }

    #[test]
    fn transaction_mutation_reloads_budget() {
        let mut state = logged_in();
        let save = state.issue(ApiCall::Delete(Target::Transactions, Uuid::new_v4()));
        let follow_up = complete(&mut state, &save, ApiResult::Saved);
        assert_eq!(
            targets(&follow_up),
            [
                (Target::Transactions, Kind::List),
                (Target::Budget, Kind::List)
            ]
        );
    }

    #[test]
    fn failure_is_stored_on_the_resource() {
        let mut state = logged_in();
        let request = state.issue(ApiCall::Delete(Target::Categories, Uuid::new_v4()));
        let follow_up = state.handle_api_event(ApiEvent {
            token: request.token,
            key: request.call.key(),
            result: Err("forbidden: category belongs to another user".to_string()),
        });
        assert!(follow_up.is_empty());
        assert_eq!(
            state.categories.error.as_deref(),
            Some("forbidden: category belongs to another user")
        );
    }
}
