//! Output depends on nothing but the input.

use crate::common::PROPOSAL;
use hwpx_babel::convert;
use proptest::prelude::*;

#[test]
fn test_proposal_is_byte_identical_across_runs() {
    let first = convert(PROPOSAL).unwrap();
    let second = convert(PROPOSAL).unwrap();
    assert_eq!(first, second);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn test_convert_is_deterministic(text in any::<String>()) {
        let first = convert(&text).unwrap();
        let second = convert(&text).unwrap();
        prop_assert_eq!(first.bytes, second.bytes);
        prop_assert_eq!(first.filename, second.filename);
    }

    #[test]
    fn test_markdown_shaped_input_always_converts(
        lines in prop::collection::vec(
            prop_oneof![
                "#{1,7} [a-z ]{0,10}",
                "[-*+] (\\[[ x]\\] )?[a-z*_`]{0,12}",
                "[0-9]{1,2}\\. [a-z]{0,8}",
                "> {0,2}>?[a-z ]{0,10}",
                "\\|[a-z ]{0,4}\\|[a-z ]{0,4}\\|",
                "\\|-{1,4}\\|:?-{1,4}:?\\|",
                "```[a-z]{0,4}",
                "\\[[a-z]{1,5}\\]\\((https?://|mailto:)?[a-z.]{1,10}\\)",
                "<[a-z]{1,5}>",
                "",
            ],
            0..24,
        )
    ) {
        let text = lines.join("\n");
        prop_assert!(convert(&text).is_ok());
    }
}
