use account_order_tree::{AccountId, AccountRegistry, TreeError};
use primitive_types::U256;

fn addr(n: u64) -> AccountId {
    AccountId::from_low_u64_be(n)
}

#[test]
fn scenario_empty_registry_has_no_rankings() {
    let registry = AccountRegistry::new();
    assert!(registry.is_empty());
    assert_eq!(registry.top_n(10), Vec::<AccountId>::new());
    assert_eq!(registry.bottom_n(10), Vec::<AccountId>::new());
    assert_eq!(registry.total_balance(), U256::zero());
}

#[test]
fn scenario_ascending_deposits_rank_descending_by_balance() {
    let mut registry = AccountRegistry::new();
    for i in 1..=20u128 {
        registry.deposit(addr(i as u64), i).unwrap();
    }

    let expected: Vec<AccountId> = (1..=20u64).rev().map(addr).collect();
    assert_eq!(registry.top_n(20), expected);
}

#[test]
fn scenario_balance_bump_reorders_only_the_bumped_pair() {
    let mut registry = AccountRegistry::new();
    for i in 1..=20u128 {
        registry.deposit(addr(i as u64), i).unwrap();
    }
    let before = registry.top_n(20);

    // addr(3) starts at balance 3; bump it past addr(4) (balance 4).
    registry.deposit(addr(3), 2).unwrap();
    let after = registry.top_n(20);

    let mut expected = before;
    let pos_3 = expected.iter().position(|k| *k == addr(3)).unwrap();
    let pos_4 = expected.iter().position(|k| *k == addr(4)).unwrap();
    expected.swap(pos_3, pos_4);
    assert_eq!(after, expected);
}

#[test]
fn scenario_withdraw_all_removes_account_from_rankings() {
    let mut registry = AccountRegistry::new();
    for i in 1..=20u128 {
        registry.deposit(addr(i as u64), i).unwrap();
    }

    let withdrawn = registry.withdraw_all(addr(12)).unwrap();
    assert_eq!(withdrawn, 12);
    assert!(!registry.contains(addr(12)));
    assert!(!registry.top_n(20).contains(&addr(12)));
}

#[test]
fn scenario_zero_balance_account_is_stored_but_unranked() {
    let mut registry = AccountRegistry::new();
    registry.deposit(addr(1), 5).unwrap();
    registry.withdraw_all(addr(1)).unwrap();

    assert!(!registry.contains(addr(1)));
    assert_eq!(registry.get_payload(addr(1)).balance, 0);
    assert!(!registry.get_payload(addr(1)).active);
    assert!(!registry.top_n(20).contains(&addr(1)));
}

#[test]
fn scenario_removing_every_account_empties_the_registry() {
    let mut registry = AccountRegistry::new();
    for i in 1..=15u64 {
        registry.deposit(addr(i), i as u128).unwrap();
    }
    for i in 1..=15u64 {
        registry.withdraw_all(addr(i)).unwrap();
    }

    assert!(registry.is_empty());
    assert_eq!(registry.total_balance(), U256::zero());
}

#[test]
fn deposit_and_withdraw_reject_the_sentinel_identifier() {
    let mut registry = AccountRegistry::new();
    assert_eq!(registry.deposit(AccountId::sentinel(), 1), Err(TreeError::NullKey));
    assert_eq!(registry.withdraw_all(AccountId::sentinel()), Err(TreeError::NullKey));
}
