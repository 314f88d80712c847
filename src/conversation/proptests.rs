//! Property-based tests for the conversation store
//!
//! These verify the reaction track always mirrors the message track.

use super::*;
use proptest::prelude::*;

fn arb_emoji() -> impl Strategy<Value = Emoji> {
    prop_oneof![
        Just(Emoji::ThumbsUp),
        Just(Emoji::Heart),
        Just(Emoji::Laugh),
    ]
}

/// One step against the store: append a record or apply a command
#[derive(Debug, Clone)]
enum Op {
    Append(Message),
    Apply(Command),
}

impl Op {
    fn run(self, store: &mut ConversationStore) {
        match self {
            Op::Append(message) => {
                store.append(message);
            }
            Op::Apply(command) => {
                let _ = store.apply(command);
            }
        }
    }
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => "[a-zA-Z <>&]{0,20}".prop_map(|text| Op::Append(Message::user(text, "10:00:00"))),
        4 => "[a-zA-Z ]{0,20}".prop_map(|text| Op::Append(Message::bot(text, "10:00:00"))),
        4 => (0usize..12, arb_emoji())
            .prop_map(|(index, emoji)| Op::Apply(Command::SetReaction { index, emoji })),
        1 => Just(Op::Apply(Command::ClearAll)),
    ]
}

proptest! {
    #[test]
    fn reactions_track_messages(ops in proptest::collection::vec(arb_op(), 0..40)) {
        let mut store = ConversationStore::new();
        for op in ops {
            op.run(&mut store);
            prop_assert_eq!(store.reactions().len(), store.messages().len());
        }
    }

    #[test]
    fn rejected_reaction_leaves_state_unchanged(
        ops in proptest::collection::vec(arb_op(), 0..20),
        extra in 0usize..5,
        emoji in arb_emoji(),
    ) {
        let mut store = ConversationStore::new();
        for op in ops {
            op.run(&mut store);
        }
        let before = store.clone();
        let index = store.len() + extra;
        let result = store.set_reaction(index, emoji);
        prop_assert_eq!(
            result,
            Err(ReactionError::IndexOutOfBounds { index, len: before.len() })
        );
        prop_assert_eq!(store, before);
    }

    #[test]
    fn in_bounds_reaction_is_applied(
        len in 1usize..10,
        pick in any::<prop::sample::Index>(),
        first in arb_emoji(),
        second in arb_emoji(),
    ) {
        let mut store = ConversationStore::new();
        for i in 0..len {
            store.append(Message::user(format!("m{i}"), "10:00:00"));
        }
        let index = pick.index(len);
        store.set_reaction(index, first).unwrap();
        prop_assert_eq!(store.reaction(index), Some(first));
        store.set_reaction(index, second).unwrap();
        prop_assert_eq!(store.reaction(index), Some(second));
        prop_assert_eq!(store.reactions().iter().filter(|r| r.is_some()).count(), 1);
    }
}
