//! In-memory entity store.
//!
//! Tables are arena-style: rows live in a `Vec` in creation order, a key map
//! points into it, and removed rows become tombstones. Secondary lookups
//! (generated numbers, user ids) are explicit indexes on [`Tables`]; rows are
//! inserted only through `Tables` so the indexes stay in step.
//!
//! One mutex guards all tables. An operation holds the guard for its whole
//! validate, mutate, respond sequence, which makes check-then-insert atomic.

use crate::models::{
    Account, AccountRef, BillingGroup, Credit, DunningGroup, PaymentMethod, Plan, PlanAssignment,
    Service, Session, UsageType,
};
use crate::services::ids;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use tokio::sync::{Mutex, MutexGuard};
use tracing::info;

/// Re-roll budget when a generated number is already taken.
const FRESH_NUMBER_ATTEMPTS: usize = 16;

/// A record stored in a [`Table`] under a primary key.
pub trait Record {
    type Key: Eq + Hash + Clone;

    fn key(&self) -> Self::Key;
}

impl Record for Account {
    type Key = String;
    fn key(&self) -> String {
        self.client_acct_id.clone()
    }
}

impl Record for Plan {
    type Key = String;
    fn key(&self) -> String {
        self.client_plan_id.clone()
    }
}

impl Record for BillingGroup {
    type Key = String;
    fn key(&self) -> String {
        self.client_billing_group_id.clone()
    }
}

impl Record for DunningGroup {
    type Key = String;
    fn key(&self) -> String {
        self.client_dunning_group_id.clone()
    }
}

impl Record for Service {
    type Key = String;
    fn key(&self) -> String {
        self.client_service_id.clone()
    }
}

impl Record for UsageType {
    type Key = String;
    fn key(&self) -> String {
        self.usage_type_code.clone()
    }
}

impl Record for Credit {
    type Key = i64;
    fn key(&self) -> i64 {
        self.credit_no
    }
}

impl Record for Session {
    type Key = String;
    fn key(&self) -> String {
        self.session_id.clone()
    }
}

impl Record for PlanAssignment {
    type Key = i64;
    fn key(&self) -> i64 {
        self.plan_instance_no
    }
}

impl Record for PaymentMethod {
    type Key = (i64, i64);
    fn key(&self) -> (i64, i64) {
        (self.acct_no, self.payment_method_no)
    }
}

/// Keyed collection of one entity type.
pub struct Table<T: Record> {
    rows: Vec<Option<T>>,
    index: HashMap<T::Key, usize>,
    latest: Option<usize>,
}

impl<T: Record> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            index: HashMap::new(),
            latest: None,
        }
    }
}

impl<T: Record> Table<T> {
    /// Add a record. A record already stored under the same key is
    /// tombstoned and returned.
    pub fn insert(&mut self, record: T) -> Option<T> {
        let key = record.key();
        let displaced = match self.index.get(&key) {
            Some(&i) => self.rows[i].take(),
            None => None,
        };
        let idx = self.rows.len();
        self.rows.push(Some(record));
        self.index.insert(key, idx);
        self.latest = Some(idx);
        displaced
    }

    pub fn lookup<Q>(&self, key: &Q) -> Option<&T>
    where
        T::Key: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.get(key).and_then(|&i| self.rows[i].as_ref())
    }

    pub fn lookup_mut<Q>(&mut self, key: &Q) -> Option<&mut T>
    where
        T::Key: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.index.get(key) {
            Some(&i) => self.rows[i].as_mut(),
            None => None,
        }
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        T::Key: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    pub fn find<P>(&self, mut pred: P) -> Option<&T>
    where
        P: FnMut(&T) -> bool,
    {
        self.list().find(|r| pred(r))
    }

    /// Live records in creation order.
    pub fn list(&self) -> impl Iterator<Item = &T> + '_ {
        self.rows.iter().flatten()
    }

    pub fn list_mut(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        self.rows.iter_mut().flatten()
    }

    /// Most recently inserted live record.
    pub fn latest(&self) -> Option<&T> {
        self.latest.and_then(|i| self.rows[i].as_ref())
    }

    pub fn remove<Q>(&mut self, key: &Q) -> Option<T>
    where
        T::Key: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = self.index.remove(key)?;
        let removed = self.rows[idx].take();
        if self.latest == Some(idx) {
            self.latest = self.rows.iter().rposition(Option::is_some);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn clear(&mut self) {
        self.rows.clear();
        self.index.clear();
        self.latest = None;
    }
}

/// Draw numbers of `digits` width until one is non-zero and not `taken`.
fn fresh_number(digits: u32, taken: impl Fn(i64) -> bool) -> i64 {
    let mut candidate = ids::number(digits);
    for _ in 0..FRESH_NUMBER_ATTEMPTS {
        if candidate != 0 && !taken(candidate) {
            break;
        }
        candidate = ids::number(digits);
    }
    candidate
}

/// Record counts per table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    pub accounts: usize,
    pub plans: usize,
    pub active_plans: usize,
    pub billing_groups: usize,
    pub dunning_groups: usize,
    pub services: usize,
    pub usage_types: usize,
    pub credits: usize,
    pub sessions: usize,
    pub plan_assignments: usize,
    pub payment_methods: usize,
}

/// Every table the mock keeps, plus secondary indexes.
#[derive(Default)]
pub struct Tables {
    accounts: Table<Account>,
    plans: Table<Plan>,
    billing_groups: Table<BillingGroup>,
    dunning_groups: Table<DunningGroup>,
    services: Table<Service>,
    usage_types: Table<UsageType>,
    credits: Table<Credit>,
    sessions: Table<Session>,
    assignments: Table<PlanAssignment>,
    payment_methods: Table<PaymentMethod>,

    acct_no_index: HashMap<i64, String>,
    userid_index: HashMap<String, String>,
    plan_no_index: HashMap<i64, String>,
    billing_group_no_index: HashMap<i64, String>,
    dunning_group_no_index: HashMap<i64, String>,
    service_no_index: HashMap<i64, String>,
    usage_type_no_index: HashMap<i64, String>,
}

impl Tables {
    pub fn reset(&mut self) {
        *self = Tables::default();
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            accounts: self.accounts.len(),
            plans: self.plans.len(),
            active_plans: self.plans.list().filter(|p| p.active).count(),
            billing_groups: self.billing_groups.len(),
            dunning_groups: self.dunning_groups.len(),
            services: self.services.len(),
            usage_types: self.usage_types.len(),
            credits: self.credits.len(),
            sessions: self.sessions.len(),
            plan_assignments: self.assignments.len(),
            payment_methods: self.payment_methods.len(),
        }
    }

    // =========================================================================
    // Accounts
    // =========================================================================

    pub fn accounts(&self) -> &Table<Account> {
        &self.accounts
    }

    pub fn next_acct_no(&self) -> i64 {
        fresh_number(ids::ACCT_NO_DIGITS, |n| self.acct_no_index.contains_key(&n))
    }

    pub fn insert_account(&mut self, account: Account) {
        self.acct_no_index
            .insert(account.acct_no, account.client_acct_id.clone());
        self.userid_index
            .insert(account.userid.clone(), account.client_acct_id.clone());
        self.accounts.insert(account);
    }

    /// Resolve by account number first, then by client account id.
    pub fn account(&self, account_ref: AccountRef<'_>) -> Option<&Account> {
        account_ref
            .acct_no
            .and_then(|no| self.account_by_no(no))
            .or_else(|| {
                account_ref
                    .client_acct_id
                    .and_then(|id| self.accounts.lookup(id))
            })
    }

    pub fn account_by_no(&self, acct_no: i64) -> Option<&Account> {
        self.acct_no_index
            .get(&acct_no)
            .and_then(|id| self.accounts.lookup(id.as_str()))
    }

    pub fn account_by_userid(&self, userid: &str) -> Option<&Account> {
        self.userid_index
            .get(userid)
            .and_then(|id| self.accounts.lookup(id.as_str()))
    }

    pub fn account_mut(&mut self, acct_no: i64) -> Option<&mut Account> {
        let id = self.acct_no_index.get(&acct_no)?;
        self.accounts.lookup_mut(id.as_str())
    }

    pub fn contains_client_acct_id(&self, client_acct_id: &str) -> bool {
        self.accounts.contains(client_acct_id)
    }

    pub fn contains_userid(&self, userid: &str) -> bool {
        self.userid_index.contains_key(userid)
    }

    pub fn contains_acct_no(&self, acct_no: i64) -> bool {
        self.acct_no_index.contains_key(&acct_no)
    }

    /// Accounts whose senior (parent) account is `acct_no`.
    pub fn child_accounts(&self, acct_no: i64) -> Vec<&Account> {
        self.accounts
            .list()
            .filter(|a| a.senior_acct_no == Some(acct_no))
            .collect()
    }

    // =========================================================================
    // Plans
    // =========================================================================

    pub fn plans(&self) -> &Table<Plan> {
        &self.plans
    }

    pub fn next_plan_no(&self) -> i64 {
        fresh_number(ids::PLAN_NO_DIGITS, |n| self.plan_no_index.contains_key(&n))
    }

    /// Insert a plan. An inactive plan under the same client plan id is
    /// replaced outright.
    pub fn insert_plan(&mut self, plan: Plan) {
        let plan_no = plan.plan_no;
        self.plan_no_index.insert(plan_no, plan.client_plan_id.clone());
        if let Some(old) = self.plans.insert(plan) {
            if old.plan_no != plan_no {
                self.plan_no_index.remove(&old.plan_no);
            }
        }
    }

    pub fn plan(&self, client_plan_id: &str) -> Option<&Plan> {
        self.plans.lookup(client_plan_id)
    }

    pub fn active_plan(&self, client_plan_id: &str) -> Option<&Plan> {
        self.plan(client_plan_id).filter(|p| p.active)
    }

    pub fn active_plans(&self) -> impl Iterator<Item = &Plan> + '_ {
        self.plans.list().filter(|p| p.active)
    }

    pub fn plan_by_no(&self, plan_no: i64) -> Option<&Plan> {
        self.plan_no_index
            .get(&plan_no)
            .and_then(|id| self.plans.lookup(id.as_str()))
    }

    pub fn plan_mut(&mut self, client_plan_id: &str) -> Option<&mut Plan> {
        self.plans.lookup_mut(client_plan_id)
    }

    /// Take a plan out of the active set. Returns false when unknown.
    pub fn mark_plan_inactive(&mut self, client_plan_id: &str) -> bool {
        match self.plans.lookup_mut(client_plan_id) {
            Some(plan) => {
                plan.active = false;
                true
            }
            None => false,
        }
    }

    pub fn remove_plan_by_no(&mut self, plan_no: i64) -> Option<Plan> {
        let id = self.plan_no_index.remove(&plan_no)?;
        self.plans.remove(id.as_str())
    }

    // =========================================================================
    // Billing and dunning groups
    // =========================================================================

    pub fn billing_groups(&self) -> &Table<BillingGroup> {
        &self.billing_groups
    }

    pub fn next_billing_group_no(&self) -> i64 {
        fresh_number(ids::BILLING_GROUP_NO_DIGITS, |n| {
            self.billing_group_no_index.contains_key(&n)
        })
    }

    pub fn insert_billing_group(&mut self, group: BillingGroup) {
        self.billing_group_no_index
            .insert(group.billing_group_no, group.client_billing_group_id.clone());
        self.billing_groups.insert(group);
    }

    pub fn billing_group(&self, client_billing_group_id: &str) -> Option<&BillingGroup> {
        self.billing_groups.lookup(client_billing_group_id)
    }

    pub fn billing_group_by_no(&self, billing_group_no: i64) -> Option<&BillingGroup> {
        self.billing_group_no_index
            .get(&billing_group_no)
            .and_then(|id| self.billing_groups.lookup(id.as_str()))
    }

    pub fn billing_group_mut(&mut self, client_billing_group_id: &str) -> Option<&mut BillingGroup> {
        self.billing_groups.lookup_mut(client_billing_group_id)
    }

    pub fn billing_groups_for(&self, acct_no: i64) -> Vec<&BillingGroup> {
        self.billing_groups
            .list()
            .filter(|g| g.acct_no == acct_no)
            .collect()
    }

    pub fn dunning_groups(&self) -> &Table<DunningGroup> {
        &self.dunning_groups
    }

    pub fn next_dunning_group_no(&self) -> i64 {
        fresh_number(ids::DUNNING_GROUP_NO_DIGITS, |n| {
            self.dunning_group_no_index.contains_key(&n)
        })
    }

    pub fn insert_dunning_group(&mut self, group: DunningGroup) {
        self.dunning_group_no_index
            .insert(group.dunning_group_no, group.client_dunning_group_id.clone());
        self.dunning_groups.insert(group);
    }

    pub fn dunning_group(&self, client_dunning_group_id: &str) -> Option<&DunningGroup> {
        self.dunning_groups.lookup(client_dunning_group_id)
    }

    pub fn dunning_group_mut(&mut self, client_dunning_group_id: &str) -> Option<&mut DunningGroup> {
        self.dunning_groups.lookup_mut(client_dunning_group_id)
    }

    pub fn dunning_groups_for(&self, acct_no: i64) -> Vec<&DunningGroup> {
        self.dunning_groups
            .list()
            .filter(|g| g.acct_no == acct_no)
            .collect()
    }

    // =========================================================================
    // Services and usage types
    // =========================================================================

    pub fn services(&self) -> &Table<Service> {
        &self.services
    }

    pub fn next_service_no(&self) -> i64 {
        fresh_number(ids::SERVICE_NO_DIGITS, |n| self.service_no_index.contains_key(&n))
    }

    pub fn insert_service(&mut self, service: Service) {
        let service_no = service.service_no;
        self.service_no_index
            .insert(service_no, service.client_service_id.clone());
        if let Some(old) = self.services.insert(service) {
            if old.service_no != service_no {
                self.service_no_index.remove(&old.service_no);
            }
        }
    }

    pub fn service(&self, client_service_id: &str) -> Option<&Service> {
        self.services.lookup(client_service_id)
    }

    pub fn service_by_no(&self, service_no: i64) -> Option<&Service> {
        self.service_no_index
            .get(&service_no)
            .and_then(|id| self.services.lookup(id.as_str()))
    }

    pub fn service_by_name_and_type(&self, name: &str, service_type: &str) -> Option<&Service> {
        self.services
            .find(|s| s.service_name == name && s.service_type == service_type)
    }

    pub fn usage_types(&self) -> &Table<UsageType> {
        &self.usage_types
    }

    pub fn next_usage_type_no(&self) -> i64 {
        fresh_number(ids::USAGE_TYPE_NO_DIGITS, |n| {
            self.usage_type_no_index.contains_key(&n)
        })
    }

    pub fn insert_usage_type(&mut self, usage_type: UsageType) {
        let usage_type_no = usage_type.usage_type_no;
        self.usage_type_no_index
            .insert(usage_type_no, usage_type.usage_type_code.clone());
        if let Some(old) = self.usage_types.insert(usage_type) {
            if old.usage_type_no != usage_type_no {
                self.usage_type_no_index.remove(&old.usage_type_no);
            }
        }
    }

    pub fn usage_type(&self, code: &str) -> Option<&UsageType> {
        self.usage_types.lookup(code)
    }

    pub fn usage_type_by_no(&self, usage_type_no: i64) -> Option<&UsageType> {
        self.usage_type_no_index
            .get(&usage_type_no)
            .and_then(|code| self.usage_types.lookup(code.as_str()))
    }

    // =========================================================================
    // Credits
    // =========================================================================

    pub fn next_credit_no(&self) -> i64 {
        fresh_number(ids::CREDIT_NO_DIGITS, |n| self.credits.contains(&n))
    }

    pub fn insert_credit(&mut self, credit: Credit) {
        self.credits.insert(credit);
    }

    pub fn credit(&self, credit_no: i64) -> Option<&Credit> {
        self.credits.lookup(&credit_no)
    }

    pub fn credits_for(&self, acct_no: i64) -> Vec<&Credit> {
        self.credits
            .list()
            .filter(|c| c.acct_no == acct_no)
            .collect()
    }

    // =========================================================================
    // Plan assignments
    // =========================================================================

    pub fn next_plan_instance_no(&self) -> i64 {
        fresh_number(ids::PLAN_INSTANCE_NO_DIGITS, |n| self.assignments.contains(&n))
    }

    pub fn insert_assignment(&mut self, assignment: PlanAssignment) {
        self.assignments.insert(assignment);
    }

    pub fn assignments_for(&self, acct_no: i64) -> Vec<&PlanAssignment> {
        self.assignments
            .list()
            .filter(|a| a.acct_no == acct_no)
            .collect()
    }

    // =========================================================================
    // Payment methods and sessions
    // =========================================================================

    /// Payment method numbers count up from 1 per account.
    pub fn next_payment_method_no(&self, acct_no: i64) -> i64 {
        self.payment_methods
            .list()
            .filter(|m| m.acct_no == acct_no)
            .map(|m| m.payment_method_no)
            .max()
            .unwrap_or(0)
            + 1
    }

    pub fn insert_payment_method(&mut self, method: PaymentMethod) {
        self.payment_methods.insert(method);
    }

    pub fn payment_method(&self, acct_no: i64, payment_method_no: i64) -> Option<&PaymentMethod> {
        self.payment_methods.lookup(&(acct_no, payment_method_no))
    }

    pub fn payment_method_mut(
        &mut self,
        acct_no: i64,
        payment_method_no: i64,
    ) -> Option<&mut PaymentMethod> {
        self.payment_methods.lookup_mut(&(acct_no, payment_method_no))
    }

    pub fn payment_methods_for(&self, acct_no: i64) -> Vec<&PaymentMethod> {
        self.payment_methods
            .list()
            .filter(|m| m.acct_no == acct_no)
            .collect()
    }

    /// Drop `payment_method_no` as primary from every billing group of the account.
    pub fn clear_primary_payment_method(&mut self, acct_no: i64, payment_method_no: i64) {
        for group in self.billing_groups.list_mut() {
            if group.acct_no == acct_no && group.primary_payment_method_no == Some(payment_method_no)
            {
                group.primary_payment_method_no = None;
            }
        }
    }

    pub fn insert_session(&mut self, session: Session) {
        self.sessions.insert(session);
    }

    pub fn session(&self, session_id: &str) -> Option<&Session> {
        self.sessions.lookup(session_id)
    }
}

/// Shared handle to the mock's state.
#[derive(Default)]
pub struct Store {
    tables: Mutex<Tables>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclusive access to every table for the duration of one operation.
    pub async fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().await
    }

    pub async fn reset(&self) {
        self.tables.lock().await.reset();
        info!("Entity store reset");
    }

    pub async fn stats(&self) -> StoreStats {
        self.tables.lock().await.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn account(acct_no: i64, client_acct_id: &str, userid: &str) -> Account {
        Account {
            acct_no,
            client_acct_id: client_acct_id.to_string(),
            userid: userid.to_string(),
            currency: "usd".to_string(),
            status_cd: 1,
            notify_method: 10,
            senior_acct_no: None,
            email: None,
            first_name: None,
            last_name: None,
            notify_tmplt_grp_id: None,
            collections_group_id: None,
            supp_fields: Vec::new(),
            functional_acct_groups: Vec::new(),
            created_utc: Utc::now(),
        }
    }

    fn plan(plan_no: i64, client_plan_id: &str) -> Plan {
        Plan {
            plan_no,
            client_plan_id: client_plan_id.to_string(),
            plan_name: format!("{} name", client_plan_id),
            plan_type: "Master Recurring Plan".to_string(),
            currency: "usd".to_string(),
            description: None,
            active: true,
            services: Vec::new(),
            supplemental_fields: Vec::new(),
            created_utc: Utc::now(),
        }
    }

    #[test]
    fn table_tracks_latest_and_tombstones_on_remove() {
        let mut tables = Tables::default();
        tables.insert_plan(plan(1, "a"));
        tables.insert_plan(plan(2, "b"));
        assert_eq!(tables.plans().latest().unwrap().plan_no, 2);

        let removed = tables.remove_plan_by_no(2).unwrap();
        assert_eq!(removed.client_plan_id, "b");
        assert_eq!(tables.plans().latest().unwrap().plan_no, 1);
        assert_eq!(tables.plans().len(), 1);
        assert!(tables.plan_by_no(2).is_none());
    }

    #[test]
    fn reinserting_a_key_replaces_the_row() {
        let mut tables = Tables::default();
        tables.insert_plan(plan(10, "p"));
        tables.mark_plan_inactive("p");
        tables.insert_plan(plan(11, "p"));

        assert_eq!(tables.plans().len(), 1);
        assert!(tables.plan_by_no(10).is_none());
        assert_eq!(tables.active_plan("p").unwrap().plan_no, 11);
        assert_eq!(tables.plans().list().count(), 1);
    }

    #[test]
    fn account_resolves_by_number_or_client_id() {
        let mut tables = Tables::default();
        tables.insert_account(account(1234567, "acme-1", "u-1"));

        let by_no = tables.account(AccountRef::new(Some(1234567), None)).unwrap();
        assert_eq!(by_no.client_acct_id, "acme-1");

        let by_id = tables.account(AccountRef::new(None, Some("acme-1"))).unwrap();
        assert_eq!(by_id.acct_no, 1234567);

        let fallback = tables
            .account(AccountRef::new(Some(42), Some("acme-1")))
            .unwrap();
        assert_eq!(fallback.acct_no, 1234567);

        assert!(tables.account(AccountRef::new(Some(0), Some(""))).is_none());
        assert_eq!(tables.account_by_userid("u-1").unwrap().acct_no, 1234567);
        assert!(tables.contains_acct_no(1234567));
        assert!(tables.contains_userid("u-1"));
    }

    #[test]
    fn deactivated_plan_leaves_active_set_but_stays_stored() {
        let mut tables = Tables::default();
        tables.insert_plan(plan(5, "basic"));
        assert!(tables.mark_plan_inactive("basic"));
        assert!(tables.active_plan("basic").is_none());
        assert!(tables.plan("basic").is_some());
        assert_eq!(tables.stats().active_plans, 0);
        assert!(!tables.mark_plan_inactive("missing"));
    }

    #[test]
    fn payment_method_numbers_count_per_account() {
        let mut tables = Tables::default();
        assert_eq!(tables.next_payment_method_no(7), 1);
        tables.insert_payment_method(PaymentMethod {
            acct_no: 7,
            payment_method_no: 1,
            client_payment_method_id: "pm-1".to_string(),
            billing_group_no: 99,
            pay_method_type: 1,
            cc_suffix: "1111".to_string(),
            cc_expire_mm: 12,
            cc_expire_yyyy: 2099,
            active: true,
            created_utc: Utc::now(),
        });
        assert_eq!(tables.next_payment_method_no(7), 2);
        assert_eq!(tables.next_payment_method_no(8), 1);
    }

    #[test]
    fn fresh_number_skips_taken_values() {
        let n = fresh_number(1, |n| n != 7);
        assert_eq!(n, 7);
    }

    #[tokio::test]
    async fn reset_empties_every_table() {
        let store = Store::new();
        {
            let mut tables = store.lock().await;
            tables.insert_account(account(1, "a", "u"));
            tables.insert_plan(plan(2, "p"));
        }
        assert_eq!(store.stats().await.accounts, 1);

        store.reset().await;
        assert_eq!(store.stats().await, StoreStats::default());
    }
}
