use std::collections::HashMap;

use wortdeck_types::WordProfile;

/// One card template of the note model
pub struct CardTemplate {
    pub name: &'static str,
    pub front: &'static str,
    pub back: &'static str,
}

/// Field order matters: AnkiConnect's createModel takes them in order, and
/// the first field is the note's sort field.
pub const MODEL_FIELDS: [&str; 19] = [
    "Wort_DE",
    "Wort_SL",
    "Wortarten",
    "Audio_Wort",
    "Artikel",
    "Plural",
    "Praesens",
    "Praeteritum",
    "Perfekt",
    "Picture",
    "Satz1_DE",
    "Satz1_SL",
    "Audio_S1",
    "Satz2_DE",
    "Satz2_SL",
    "Audio_S2",
    "Satz3_DE",
    "Satz3_SL",
    "Audio_S3",
];

pub const CARD_TEMPLATES: [CardTemplate; 2] = [
    CardTemplate {
        name: "Card 1 DE->SL",
        front: "{{Wort_DE}}{{Wortarten}}{{Audio_Wort}}",
        back: r#"
{{#Artikel}}{{Artikel}}{{/Artikel}}
{{Wort_DE}}{{Wortarten}}
{{#Plural}}{{Plural}}{{/Plural}}
<div>{{Picture}}</div>
<div style='font-family: Arial; font-size: 16px;'>
{{#Praesens}}<br>Präsens: {{Praesens}}{{/Praesens}}
{{#Praeteritum}}<br>Präteritum: {{Praeteritum}}{{/Praeteritum}}
{{#Perfekt}}<br>Perfekt: {{Perfekt}}{{/Perfekt}}
</div>
<hr id=answer>
{{Wort_SL}}
<hr>
{{#Satz1_DE}}
<div style='font-family: Arial; font-size: 16px;'>{{Satz1_DE}}{{Audio_S1}}</div>
<div style='font-family: Arial; font-size: 14px;'>{{Satz1_SL}}</div><br>
{{/Satz1_DE}}
{{#Satz2_DE}}
<div style='font-family: Arial; font-size: 16px;'>{{Satz2_DE}}{{Audio_S2}}</div>
<div style='font-family: Arial; font-size: 14px;'>{{Satz2_SL}}</div><br>
{{/Satz2_DE}}
{{#Satz3_DE}}
<div style='font-family: Arial; font-size: 16px;'>{{Satz3_DE}}{{Audio_S3}}</div>
<div style='font-family: Arial; font-size: 14px;'>{{Satz3_SL}}</div><br>
{{/Satz3_DE}}
"#,
    },
    CardTemplate {
        name: "Card 2 SL->DE",
        front: "{{Wort_SL}}",
        back: r#"
{{Wort_SL}}
<hr id=answer>
{{#Artikel}}{{Artikel}}{{/Artikel}}
{{Wort_DE}}{{Wortarten}}
{{#Plural}}{{Plural}}{{/Plural}}
{{Audio_Wort}}
<div>{{Picture}}</div>
<div style='font-family: Arial; font-size: 16px;'>
{{#Praesens}}<br>Präsens: {{Praesens}}{{/Praesens}}
{{#Praeteritum}}<br>Präteritum: {{Praeteritum}}{{/Praeteritum}}
{{#Perfekt}}<br>Perfekt: {{Perfekt}}{{/Perfekt}}
</div>
<hr>
{{#Satz1_SL}}
<div style='font-family: Arial; font-size: 16px;'>{{Satz1_SL}}</div>
<div style='font-family: Arial; font-size: 14px;'>{{Satz1_DE}}{{Audio_S1}}</div><br>
{{/Satz1_SL}}
{{#Satz2_SL}}
<div style='font-family: Arial; font-size: 16px;'>{{Satz2_SL}}</div>
<div style='font-family: Arial; font-size: 14px;'>{{Satz2_DE}}{{Audio_S2}}</div><br>
{{/Satz2_SL}}
{{#Satz3_SL}}
<div style='font-family: Arial; font-size: 16px;'>{{Satz3_SL}}</div>
<div style='font-family: Arial; font-size: 14px;'>{{Satz3_DE}}{{Audio_S3}}</div><br>
{{/Satz3_SL}}
"#,
    },
];

/// Map a word profile onto the text fields of the note. Media fields
/// (Audio_*, Picture) are filled in separately once the files are stored in
/// the collection.
pub fn text_fields(profile: &WordProfile) -> HashMap<String, String> {
    let mut fields: HashMap<String, String> = MODEL_FIELDS
        .iter()
        .map(|name| (name.to_string(), String::new()))
        .collect();

    fields.insert("Wort_DE".to_string(), profile.word.clone());
    fields.insert("Wort_SL".to_string(), profile.translation.clone());
    fields.insert("Wortarten".to_string(), profile.classification.clone());

    if let Some(noun) = &profile.grammar.noun {
        fields.insert(
            "Artikel".to_string(),
            noun.article.clone().unwrap_or_default(),
        );
        fields.insert(
            "Plural".to_string(),
            noun.plural_form.clone().unwrap_or_default(),
        );
    }

    // Conjugation fields are only worth showing for irregular verbs
    if let Some(verb) = &profile.grammar.verb {
        if verb.irregular_verb {
            fields.insert("Praesens".to_string(), verb.praesens.join(", "));
            fields.insert("Praeteritum".to_string(), verb.praeteritum.join(", "));
            fields.insert("Perfekt".to_string(), verb.perfekt.join(", "));
        }
    }

    for (i, example) in profile.examples.iter().take(3).enumerate() {
        fields.insert(format!("Satz{}_DE", i + 1), example.sentence.clone());
        fields.insert(format!("Satz{}_SL", i + 1), example.translation.clone());
    }

    fields
}
