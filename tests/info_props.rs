use proptest::prelude::*;

use indel_vcf::indel::Annotations;
use indel_vcf::vcf::INFO_FIELDS;
use indel_vcf::{IndelCall, RecordBuilder};
use indel_vcf::reference::ContigNaming;

fn annotations() -> impl Strategy<Value = Annotations> {
    (
        proptest::collection::vec(any::<bool>(), 11),
        proptest::option::of("[a-z|;=,% \t]{0,8}"),
        proptest::option::of(-1.0f64..1.0),
        proptest::option::of(-5i64..50),
    )
        .prop_map(|(flags, text, maf, repeat)| Annotations {
            predicted_class: text.clone(),
            annotation: text.clone(),
            clin_info: text,
            max_maf: maf,
            repeat,
            is_common: flags[0],
            is_uniq_mapped: flags[1],
            is_near_boundary: flags[2],
            is_bidirectional: flags[3],
            is_multiallelic: flags[4],
            is_truncating: flags[5],
            is_nmd_insensitive: flags[6],
            is_at_ins: flags[7],
            is_at_del: flags[8],
            reclassified: flags[9].then(|| "panel".to_string()),
            ..Annotations::default()
        })
}

proptest! {
    #[test]
    fn info_tokens_are_well_formed(
        annotations in annotations(),
        insertion in any::<bool>(),
        sequence in "[ACGT]{1,8}",
    ) {
        let call = if insertion {
            IndelCall::new("chr3", 50, "-", &sequence)
        } else {
            IndelCall::new("chr3", 50, &sequence, "-")
        }
        .expect("valid call")
        .with_annotations(annotations.clone());

        let record = RecordBuilder::standard(ContigNaming::PREFIXED).build(&call, b'g');
        let info = record.info();

        prop_assert!(!info.is_empty());
        prop_assert!(!info.contains(";;"));
        prop_assert!(!info.starts_with(';') && !info.ends_with(';'));
        prop_assert!(record.info_tokens().iter().all(|token| !token.is_empty()));
        prop_assert!(!info.contains(char::is_whitespace));
        if info != "." {
            let split: Vec<_> = info.split(';').collect();
            let tokens: Vec<_> = record.info_tokens().iter().map(String::as_str).collect();
            prop_assert_eq!(split, tokens);
        }
        for token in record.info_tokens() {
            prop_assert!(token.matches('=').count() <= 1, "value leaks '=': {}", token);
        }

        let flags = [
            ("COMMON", annotations.is_common),
            ("UQM", annotations.is_uniq_mapped),
            ("NEB", annotations.is_near_boundary),
            ("BID", annotations.is_bidirectional),
            ("MTA", annotations.is_multiallelic),
            ("TRC", annotations.is_truncating),
            ("NMD", annotations.is_nmd_insensitive),
            ("ATI", annotations.is_at_ins),
            ("ATD", annotations.is_at_del),
        ];
        for (code, set) in flags {
            let present = record.info_tokens().iter().any(|token| token == code);
            prop_assert_eq!(present, set, "flag {} presence", code);
        }

        let codes: Vec<_> = record
            .info_tokens()
            .iter()
            .map(|token| token.split('=').next().unwrap_or_default())
            .collect();
        let positions: Vec<_> = codes
            .iter()
            .filter_map(|code| INFO_FIELDS.iter().position(|spec| spec.code == *code))
            .collect();
        prop_assert!(positions.windows(2).all(|pair| pair[0] < pair[1]), "tokens out of order");

        prop_assert_eq!(record.pos(), 49);
        prop_assert!(record.reference().starts_with('G'));
        prop_assert!(record.alternate().starts_with('G'));
    }
}
