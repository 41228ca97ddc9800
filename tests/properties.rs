#![allow(non_snake_case)]
use proptest::prelude::*;
use seven_dice::{
    BetSelection,
    Choice,
    GameError,
    Verdict,
    test_helpers::TestContext,
};

fn current_thread() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

prop_compose! {
    fn any_choice()(idx in 0usize..3) -> Choice {
        Choice::ALL[idx]
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn deposit_then_withdraw__restores_balance(
        (start, amount) in (0u64..1_000_000, 1u64..1_000_000)
    ) {
        let mut ctx = TestContext::new_with_balance(start);
        prop_assert_eq!(ctx.controller().deposit(&amount.to_string()), Ok(start + amount));
        prop_assert_eq!(ctx.controller().withdraw(&amount.to_string()), Ok(start));
    }

    #[test]
    fn withdraw__over_balance_changes_nothing(
        (balance, extra) in (0u64..1_000_000, 1u64..1_000)
    ) {
        let mut ctx = TestContext::new_with_balance(balance);
        let result = ctx.controller().withdraw(&(balance + extra).to_string());
        let is_insufficient = matches!(result, Err(GameError::InsufficientFunds { .. }));
        prop_assert!(is_insufficient);
        prop_assert_eq!(ctx.balance(), balance);
    }

    #[test]
    fn play__settles_exactly(
        (stake, first, second, choice) in (1u64..=10_000, 1u8..=6, 1u8..=6, any_choice())
    ) {
        let rt = current_thread();
        rt.block_on(async {
            _play__settles_exactly(stake, first, second, choice).await
        })?;
    }

    #[test]
    fn play__unaffordable_bet_changes_nothing(
        (balance, stake, choice) in (0u64..10_000, 1u64..20_000, any_choice())
    ) {
        prop_assume!(stake > balance);
        let rt = current_thread();
        rt.block_on(async {
            _play__unaffordable_bet_changes_nothing(balance, stake, choice).await
        })?;
    }
}

async fn _play__settles_exactly(
    stake: u64,
    first: u8,
    second: u8,
    choice: Choice,
) -> Result<(), TestCaseError> {
    // given
    let mut ctx = TestContext::new_with_balance(stake);
    ctx.controller()
        .select_bet(BetSelection::Amount(stake))
        .unwrap();
    let total = first + second;
    let wins = match choice {
        Choice::Under => total < 7,
        Choice::Equal => total == 7,
        Choice::Over => total > 7,
    };
    let multiplier_bps: u64 = if choice == Choice::Equal { 58_000 } else { 23_000 };

    // when
    let outcome = ctx.play_with_dice(choice, first, second).await.unwrap();

    // then
    prop_assert_eq!(outcome.stake, stake);
    prop_assert_eq!(outcome.dice.total(), total);
    if wins {
        let expected = stake * multiplier_bps / 10_000;
        prop_assert_eq!(outcome.verdict, Verdict::Win);
        prop_assert_eq!(outcome.winnings, expected);
        prop_assert_eq!(ctx.balance(), expected);
    } else {
        prop_assert_eq!(outcome.verdict, Verdict::Lose);
        prop_assert_eq!(outcome.winnings, 0);
        prop_assert_eq!(ctx.balance(), 0);
    }
    Ok(())
}

async fn _play__unaffordable_bet_changes_nothing(
    balance: u64,
    stake: u64,
    choice: Choice,
) -> Result<(), TestCaseError> {
    // given
    let mut ctx = TestContext::new_with_balance(stake);
    ctx.controller()
        .select_bet(BetSelection::Amount(stake))
        .unwrap();
    ctx.controller()
        .withdraw(&(stake - balance).to_string())
        .unwrap();
    let before = ctx.controller().state().clone();

    // when
    let result = ctx.play_with_dice(choice, 6, 6).await;

    // then
    prop_assert_eq!(
        result,
        Err(GameError::InsufficientFunds {
            requested: stake,
            available: balance
        })
    );
    prop_assert_eq!(ctx.controller().state(), &before);
    Ok(())
}
