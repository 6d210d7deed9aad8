use nbdoc_core::{
    map_style, map_style_labels, DocStyle, GenerationParameters, Language, StyleOptions, Tone,
};
use pretty_assertions::assert_eq;

#[test]
fn every_pair_maps_to_table_values() {
    let tones = [
        (Tone::Professional, 0.3),
        (Tone::Creative, 0.8),
        (Tone::Casual, 0.6),
    ];
    let styles = [(DocStyle::Concise, 1500), (DocStyle::Explanatory, 3000)];

    for (tone, temperature) in tones {
        for (doc_style, max_output_tokens) in styles {
            let options = StyleOptions {
                language: Language::German,
                doc_style,
                tone,
            };
            assert_eq!(
                map_style(&options),
                GenerationParameters {
                    temperature,
                    max_output_tokens,
                },
                "tone={tone} doc_style={doc_style}"
            );
        }
    }
}

#[test]
fn mapping_is_pure() {
    let options = StyleOptions {
        language: Language::Hindi,
        doc_style: DocStyle::Concise,
        tone: Tone::Creative,
    };
    assert_eq!(map_style(&options), map_style(&options));
}

#[test]
fn language_does_not_affect_parameters() {
    let base = StyleOptions::default();
    for language in Language::ALL {
        let options = StyleOptions { language, ..base };
        assert_eq!(map_style(&options), map_style(&base));
    }
}

#[test]
fn defaults_are_valid_selections() {
    let options = StyleOptions::default();
    assert_eq!(options.language, Language::English);
    assert_eq!(options.doc_style, DocStyle::Explanatory);
    assert_eq!(options.tone, Tone::Professional);
}

#[test]
fn unknown_labels_fall_back_per_knob() {
    assert_eq!(
        map_style_labels("whimsical", "epic"),
        GenerationParameters {
            temperature: 0.5,
            max_output_tokens: 2048,
        }
    );
    assert_eq!(
        map_style_labels("casual", "epic"),
        GenerationParameters {
            temperature: 0.6,
            max_output_tokens: 2048,
        }
    );
    assert_eq!(
        map_style_labels("bogus", "Concise"),
        GenerationParameters {
            temperature: 0.5,
            max_output_tokens: 1500,
        }
    );
}
