//! Property tests for the compliance gate.
//!
//! Each test checks one invariant across many inputs: every feature mix,
//! every principal, or a generated sequence of mixed operations.

use bastion_contracts::{FeatureFlags, GatedToken, TokenCall, TokenConfig, TokenError};
use bastion_protocol::Principal;
use proptest::prelude::*;

// Principal pools the generated calls draw from.
const MEMBERS: usize = 8;
const HOLDERS: usize = 5;

fn p(label: &str) -> Principal {
    Principal::derive(label)
}

fn deploy(features: FeatureFlags) -> GatedToken {
    let config = TokenConfig {
        name: "Property Token".into(),
        symbol: "PROP".into(),
        initial_supply: 1_000_000,
        decimals: 0,
        owner: p("owner"),
        features,
    };
    GatedToken::deploy(config, p("owner")).unwrap()
}

/// Every combination of the six flags, in a fixed order.
fn all_flag_combinations() -> Vec<FeatureFlags> {
    (0u8..64)
        .map(|bits| FeatureFlags {
            mintable: bits & 1 != 0,
            burnable: bits & 2 != 0,
            pausable: bits & 4 != 0,
            deny_list_enabled: bits & 8 != 0,
            allow_list_enabled: bits & 16 != 0,
            force_transfer_allowed: bits & 32 != 0,
        })
        .collect()
}

fn member(index: usize) -> Principal {
    p(&format!("user-{index}"))
}

fn holder(index: usize) -> Principal {
    p(&format!("h-{index}"))
}

/// Strategy for list administration calls over the member pool.
fn membership_call_strategy() -> impl Strategy<Value = TokenCall> {
    prop_oneof![
        (0..MEMBERS).prop_map(|i| TokenCall::Deny { account: member(i) }),
        (0..MEMBERS).prop_map(|i| TokenCall::Undeny { account: member(i) }),
        prop::collection::vec(0..MEMBERS, 0..4).prop_map(|picks| {
            TokenCall::ReplaceAllowList {
                accounts: picks.into_iter().map(member).collect(),
            }
        }),
    ]
}

/// Strategy for supply-changing and balance-moving calls over the holder pool.
fn supply_call_strategy() -> impl Strategy<Value = TokenCall> {
    prop_oneof![
        (0..HOLDERS, 0u128..500).prop_map(|(to, amount)| TokenCall::Mint {
            to: holder(to),
            amount,
        }),
        (0u128..500).prop_map(|amount| TokenCall::Burn { amount }),
        (0..HOLDERS, 0u128..500).prop_map(|(to, amount)| TokenCall::Transfer {
            to: holder(to),
            amount,
        }),
        (0..HOLDERS, 0..HOLDERS, 0u128..500).prop_map(|(from, to, amount)| {
            TokenCall::TransferFrom {
                from: holder(from),
                to: holder(to),
                amount,
            }
        }),
    ]
}

// ---------------------------------------------------------------------------
// Membership
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: no sequence of list administration leaves a principal on
    /// both lists.
    #[test]
    fn no_principal_is_ever_both_denied_and_allowed(
        calls in prop::collection::vec(membership_call_strategy(), 1..200),
    ) {
        let owner = p("owner");
        let mut token = deploy(FeatureFlags {
            deny_list_enabled: true,
            allow_list_enabled: true,
            ..FeatureFlags::default()
        });

        for call in calls {
            let _ = token.execute(&owner, call);

            for who in (0..MEMBERS).map(member) {
                prop_assert!(
                    !(token.is_denied(&who) && token.is_allowed(&who)),
                    "{} is both denied and allowed",
                    who
                );
            }
        }
    }
}

#[test]
fn deny_then_undeny_restores_membership() {
    let owner = p("owner");
    let mut token = deploy(FeatureFlags {
        deny_list_enabled: true,
        ..FeatureFlags::default()
    });
    for i in 0..20 {
        let who = member(i);
        token.deny(&owner, &who).unwrap();
        assert!(token.is_denied(&who));
        token.undeny(&owner, &who).unwrap();
        assert!(!token.is_denied(&who));
    }
}

#[test]
fn allow_list_snapshot_round_trips_and_clears() {
    let owner = p("owner");
    let (a, b, c) = (p("a"), p("b"), p("c"));
    let mut token = deploy(FeatureFlags {
        allow_list_enabled: true,
        ..FeatureFlags::default()
    });

    token.replace_allow_list(&owner, vec![a, b, c]).unwrap();
    assert_eq!(token.allow_list_snapshot(), &[a, b, c]);

    token.replace_allow_list(&owner, vec![]).unwrap();
    assert!(token.allow_list_snapshot().is_empty());
    assert!(!token.is_allowed(&a));
    assert!(!token.is_allowed(&b));
    assert!(!token.is_allowed(&c));
}

// ---------------------------------------------------------------------------
// Pause
// ---------------------------------------------------------------------------

#[test]
fn paused_token_rejects_every_balance_mutation() {
    let owner = p("owner");
    let holder = p("holder");

    for flags in all_flag_combinations().into_iter().filter(|f| f.pausable) {
        let mut token = deploy(flags);
        if flags.allow_list_enabled {
            token
                .replace_allow_list(&owner, vec![owner, holder])
                .unwrap();
        }
        token.transfer(&owner, &holder, 100).unwrap();
        token.approve(&holder, &owner, 100).unwrap();
        token.pause(&owner).unwrap();

        let supply = token.total_supply();
        let attempts = vec![
            token.transfer(&owner, &holder, 1),
            token.transfer(&holder, &owner, 1),
            token.transfer_from(&owner, &holder, &owner, 1),
            token.mint(&owner, &holder, 1),
            token.burn(&owner, 1),
            token.burn_from(&owner, &holder, 1),
        ];
        for result in attempts {
            let err = result.unwrap_err();
            assert!(
                err == TokenError::Paused
                    || err == TokenError::MintingNotEnabled
                    || err == TokenError::BurningNotEnabled,
                "unexpected {err:?} for {flags:?}"
            );
        }
        assert_eq!(token.total_supply(), supply);
        assert_eq!(token.balance_of(&holder), 100);
    }
}

// ---------------------------------------------------------------------------
// Capabilities and ownership
// ---------------------------------------------------------------------------

#[test]
fn minting_disabled_rejects_every_caller() {
    let callers = [p("owner"), p("alice"), Principal::NULL];
    for flags in all_flag_combinations().into_iter().filter(|f| !f.mintable) {
        let mut token = deploy(flags);
        for caller in &callers {
            assert_eq!(
                token.mint(caller, &p("owner"), 1),
                Err(TokenError::MintingNotEnabled)
            );
        }
    }
}

#[test]
fn renounced_token_rejects_owner_operations_for_everyone() {
    let former = p("owner");
    let mut token = deploy(FeatureFlags {
        mintable: true,
        burnable: true,
        pausable: true,
        deny_list_enabled: true,
        allow_list_enabled: false,
        force_transfer_allowed: false,
    });
    token.renounce_ownership(&former).unwrap();

    for caller in [former, p("alice"), p("bob")] {
        let unauthorized: Result<(), TokenError> = Err(TokenError::Unauthorized { caller });
        assert_eq!(token.mint(&caller, &caller, 1), unauthorized);
        assert_eq!(token.burn(&caller, 1), unauthorized);
        assert_eq!(token.pause(&caller), unauthorized);
        assert_eq!(token.transfer_ownership(&caller, &caller), unauthorized);
        assert_eq!(token.deny(&caller, &p("x")), unauthorized);
        assert_eq!(token.renounce_ownership(&caller), unauthorized);
    }
    assert_eq!(token.owner(), None);
}

#[test]
fn feature_flags_never_change() {
    let owner = p("owner");
    for flags in all_flag_combinations() {
        let mut token = deploy(flags);
        let _ = token.pause(&owner);
        let _ = token.deny(&owner, &p("x"));
        let _ = token.replace_allow_list(&owner, vec![p("y")]);
        let _ = token.renounce_ownership(&owner);
        assert_eq!(token.features().flags(), flags);
        assert_eq!(token.is_mintable(), flags.mintable);
        assert_eq!(token.is_force_transfer_allowed(), flags.force_transfer_allowed);
        assert_eq!(token.decimals(), 0);
    }
}

// ---------------------------------------------------------------------------
// Supply
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: total supply always equals the sum of every balance.
    #[test]
    fn supply_equals_sum_of_balances(
        calls in prop::collection::vec(supply_call_strategy(), 1..200),
    ) {
        let owner = p("owner");
        let mut token = deploy(FeatureFlags {
            mintable: true,
            burnable: true,
            force_transfer_allowed: true,
            ..FeatureFlags::default()
        });

        for call in calls {
            let _ = token.execute(&owner, call);

            let held: u128 = (0..HOLDERS)
                .map(holder)
                .chain(std::iter::once(owner))
                .map(|who| token.balance_of(&who))
                .sum();
            prop_assert_eq!(held, token.total_supply());
        }
    }
}
