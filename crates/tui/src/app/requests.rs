//! Background API calls and the bookkeeping that discards stale answers.

use std::collections::HashMap;

use api_types::{
    account::{AccountNew, AccountUpdate, AccountView},
    budget::BudgetOverview,
    category::{CategoryNew, CategoryUpdate, CategoryView},
    group::{GroupNew, GroupUpdate, GroupView},
    transaction::{TransactionNew, TransactionUpdate, TransactionView},
    user::{Credentials, LoginResponse},
};
use uuid::Uuid;

/// Which part of the state a call feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Session,
    Budget,
    Accounts,
    Groups,
    Categories,
    Transactions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Login,
    List,
    Detail,
    Save,
    Delete,
}

impl Kind {
    /// Reads are superseded by a newer read of the same key. Mutations all
    /// happened on the server, so every completion counts.
    fn is_sequenced(self) -> bool {
        matches!(self, Self::Login | Self::List | Self::Detail)
    }
}

pub type RequestKey = (Target, Kind);

#[derive(Debug, Clone)]
pub enum ApiCall {
    Login(Credentials),
    /// Registers the user, then logs in with the same credentials.
    Signup(Credentials),
    List(Target),
    /// Transactions of one account or category.
    Detail(Target, Uuid),
    Delete(Target, Uuid),
    CreateAccount(AccountNew),
    UpdateAccount(Uuid, AccountUpdate),
    CreateGroup(GroupNew),
    UpdateGroup(Uuid, GroupUpdate),
    CreateCategory(CategoryNew),
    UpdateCategory(Uuid, CategoryUpdate),
    CreateTransaction(TransactionNew),
    UpdateTransaction(Uuid, TransactionUpdate),
}

impl ApiCall {
    pub fn key(&self) -> RequestKey {
        match self {
            Self::Login(_) | Self::Signup(_) => (Target::Session, Kind::Login),
            Self::List(target) => (*target, Kind::List),
            Self::Detail(target, _) => (*target, Kind::Detail),
            Self::Delete(target, _) => (*target, Kind::Delete),
            Self::CreateAccount(_) | Self::UpdateAccount(..) => (Target::Accounts, Kind::Save),
            Self::CreateGroup(_) | Self::UpdateGroup(..) => (Target::Groups, Kind::Save),
            Self::CreateCategory(_) | Self::UpdateCategory(..) => {
                (Target::Categories, Kind::Save)
            }
            Self::CreateTransaction(_) | Self::UpdateTransaction(..) => {
                (Target::Transactions, Kind::Save)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub enum ApiResult {
    LoggedIn(LoginResponse),
    Accounts(Vec<AccountView>),
    Groups(Vec<GroupView>),
    Categories(Vec<CategoryView>),
    Transactions(Vec<TransactionView>),
    Budget(BudgetOverview),
    Detail(Uuid, Vec<TransactionView>),
    Saved,
    Deleted(Uuid),
}

/// A call stamped with the token it was issued under.
#[derive(Debug, Clone)]
pub struct Request {
    pub token: u64,
    pub call: ApiCall,
}

/// Completion of a [`Request`], delivered back to the event loop.
#[derive(Debug, Clone)]
pub struct ApiEvent {
    pub token: u64,
    pub key: RequestKey,
    pub result: Result<ApiResult, String>,
}

/// Latest issued token per sequenced key, and the tokens of mutations
/// still in flight.
#[derive(Debug, Default)]
pub struct RequestTracker {
    next: u64,
    latest: HashMap<RequestKey, u64>,
    in_flight: HashMap<RequestKey, Vec<u64>>,
}

impl RequestTracker {
    pub fn issue(&mut self, call: ApiCall) -> Request {
        self.next += 1;
        let key = call.key();
        if key.1.is_sequenced() {
            self.latest.insert(key, self.next);
        } else {
            self.in_flight.entry(key).or_default().push(self.next);
        }
        Request {
            token: self.next,
            call,
        }
    }

    /// Accepts a completion at most once. A read is also refused when a
    /// newer read was issued for the same key.
    pub fn accept(&mut self, key: RequestKey, token: u64) -> bool {
        if key.1.is_sequenced() {
            if self.latest.get(&key) != Some(&token) {
                return false;
            }
            self.latest.remove(&key);
            return true;
        }
        let Some(tokens) = self.in_flight.get_mut(&key) else {
            return false;
        };
        let Some(position) = tokens.iter().position(|issued| *issued == token) else {
            return false;
        };
        tokens.swap_remove(position);
        if tokens.is_empty() {
            self.in_flight.remove(&key);
        }
        true
    }

    pub fn is_pending(&self, key: RequestKey) -> bool {
        self.latest.contains_key(&key) || self.in_flight.contains_key(&key)
    }
}
