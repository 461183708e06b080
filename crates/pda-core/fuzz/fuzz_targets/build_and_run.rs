#![no_main]

use std::collections::BTreeSet;

use libfuzzer_sys::fuzz_target;
use pda_core::{Automaton, Configuration, EngineConfig, Move, Transition, WordEnumerator};

// Each rule takes four bytes: state, input (0 means epsilon), stack top, and a
// packed destination whose high nibble is the next state and whose low bits
// select up to three pushed symbols.
fn decode_rule(chunk: &[u8]) -> Transition<u8, u8, u8> {
    let state = chunk[0] % 4;
    let stack = chunk[2] % 3;
    let next_state = (chunk[3] >> 4) % 4;
    let push: Vec<u8> = (0..chunk[3] % 4).map(|i| (chunk[3] >> i) % 3).collect();
    let next = Move::new(next_state, push);

    match chunk[1] % 4 {
        0 => Transition::epsilon(state, stack, next),
        input => Transition::lettered(state, input, stack, next),
    }
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let finals: BTreeSet<u8> = (0..4).filter(|bit| data[0] & (1 << bit) != 0).collect();
    let word: Vec<u8> = data[1..].iter().take(8).map(|byte| byte % 4).collect();
    let rules: Vec<Transition<u8, u8, u8>> = data[1..].chunks_exact(4).map(decode_rule).collect();

    let Ok(automaton) = Automaton::new(0, finals, rules, 0) else {
        return;
    };
    let mut automaton = automaton.with_config(EngineConfig {
        epsilon_limit: Some(256),
    });
    let initial = Configuration::initial(0, 0);

    let first = automaton.run(&word);
    automaton.restore(&initial);
    assert_eq!(automaton.run(&word), first);

    let alphabet: Vec<u8> = automaton.alphabet().into_iter().collect();
    let mut enumerator = WordEnumerator::new(&alphabet, 3);
    while let Some(candidate) = enumerator.advance() {
        automaton.restore(&initial);
        let _ = automaton.run(candidate);
    }
});
