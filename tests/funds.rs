#![allow(non_snake_case)]
use seven_dice::{
    GameError,
    test_helpers::TestContext,
};

#[test]
fn deposit__accumulates() {
    // given
    let mut ctx = TestContext::new_with_balance(250);

    // when
    ctx.controller().deposit("100").unwrap();
    ctx.controller().deposit("  50").unwrap();

    // then
    assert_eq!(ctx.balance(), 400);
}

#[test]
fn deposit__takes_leading_digits() {
    let mut ctx = TestContext::new();
    assert_eq!(ctx.controller().deposit("12abc"), Ok(12));
    assert_eq!(ctx.controller().deposit("3.9"), Ok(15));
}

#[test]
fn deposit__rejects_non_positive_and_garbage() {
    // given
    let mut ctx = TestContext::new_with_balance(100);

    // when
    let attempts = ["", "abc", "0", "-5", "99999999999999999999999"];

    // then
    for raw in attempts {
        assert!(
            matches!(
                ctx.controller().deposit(raw),
                Err(GameError::InvalidInput { .. })
            ),
            "{raw:?} should be rejected"
        );
    }
    assert_eq!(ctx.balance(), 100);
    assert_eq!(
        ctx.renderer().alerts(),
        vec![String::from("Please enter a valid amount"); attempts.len()]
    );
}

#[test]
fn deposit__overflowing_balance_is_invalid() {
    let mut ctx = TestContext::new_with_balance(u64::MAX - 1);
    let result = ctx.controller().deposit("2");
    assert!(matches!(result, Err(GameError::InvalidInput { .. })));
    assert_eq!(ctx.balance(), u64::MAX - 1);
}

#[test]
fn withdraw__subtracts() {
    // given
    let mut ctx = TestContext::new_with_balance(1_000);

    // when
    let balance = ctx.controller().withdraw("300").unwrap();

    // then
    assert_eq!(balance, 700);
    assert_eq!(ctx.controller().status(), "Withdrew 300 MMK");
}

#[test]
fn withdraw__whole_balance_is_allowed() {
    let mut ctx = TestContext::new_with_balance(1_000);
    assert_eq!(ctx.controller().withdraw("1000"), Ok(0));
}

#[test]
fn withdraw__invalid_input_leaves_balance() {
    let mut ctx = TestContext::new_with_balance(1_000);
    let result = ctx.controller().withdraw("nope");
    assert!(matches!(result, Err(GameError::InvalidInput { .. })));
    assert_eq!(ctx.balance(), 1_000);
}

#[test]
fn deposit__renders_new_balance() {
    // given
    let mut ctx = TestContext::new();
    let frames_before = ctx.renderer().frames().len();

    // when
    ctx.controller().deposit("700").unwrap();

    // then
    let frames = ctx.renderer().frames();
    assert_eq!(frames.len(), frames_before + 1);
    let last = ctx.renderer().last_frame().unwrap();
    assert_eq!(last.balance, 700);
    assert_eq!(last.status, "Deposited 700 MMK");
}
