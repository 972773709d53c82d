use wortdeck_core::ProfileOrchestrator;
use wortdeck_types::{Facet, FacetState, MediaRef};

const PLACEHOLDER: &str = "---";

/// Render the current state of the generation to stdout. Called after every
/// facet settles, so it has to tolerate a partially populated profile:
/// anything not yet Ready shows up as a placeholder.
pub fn present(orchestrator: &ProfileOrchestrator) {
    let (Some(facets), Some(request)) = (orchestrator.facets(), orchestrator.request()) else {
        return;
    };

    println!();
    println!("Word and grammar information:");

    match orchestrator.profile() {
        Some(profile) => {
            println!("  German word:    {}", profile.word);
            println!("  Translation:    {}", profile.translation);
            println!("  Classification: {}", profile.classification);

            if let Some(noun) = &profile.grammar.noun {
                if let Some(article) = &noun.article {
                    println!("  Article:        {article}");
                }
                if let Some(plural) = &noun.plural_form {
                    println!("  Plural:         {plural}");
                }
            }
            if let Some(verb) = &profile.grammar.verb {
                if verb.irregular_verb {
                    if !verb.praesens.is_empty() {
                        println!("  Präsens:        {}", verb.praesens.join(", "));
                    }
                    if !verb.praeteritum.is_empty() {
                        println!("  Präteritum:     {}", verb.praeteritum.join(", "));
                    }
                    if !verb.perfekt.is_empty() {
                        println!("  Perfekt:        {}", verb.perfekt.join(", "));
                    }
                }
            }

            println!("Examples:");
            if profile.examples.is_empty() {
                println!("  {PLACEHOLDER}");
            }
            for (i, example) in profile.examples.iter().enumerate() {
                let audio = example
                    .audio
                    .as_ref()
                    .map(|a| format!("  [sound: {}]", a.file_name))
                    .unwrap_or_default();
                println!("  {}. {}{}", i + 1, example.sentence, audio);
                println!("     {}", example.translation);
            }
        }
        None => match facets.profile {
            FacetState::Pending => println!("  {PLACEHOLDER} (generating)"),
            FacetState::Failed => println!(
                "  generation failed: {}",
                orchestrator.facet_error(Facet::Profile).unwrap_or(PLACEHOLDER)
            ),
            _ => println!("  {PLACEHOLDER}"),
        },
    }

    if request.want_audio {
        let audio = orchestrator.profile().and_then(|p| p.audio.as_ref());
        println!(
            "Audio: {}",
            facet_line(facets.audio, audio, orchestrator.facet_error(Facet::Audio))
        );
    }
    if request.want_image {
        let image = orchestrator.profile().and_then(|p| p.image.as_ref());
        println!(
            "Image: {}",
            facet_line(facets.image, image, orchestrator.facet_error(Facet::Image))
        );
    }
}

fn facet_line(state: FacetState, media: Option<&MediaRef>, error: Option<&str>) -> String {
    match state {
        FacetState::NotRequested => PLACEHOLDER.to_string(),
        FacetState::Pending => "generating...".to_string(),
        FacetState::Ready => media
            .map(|m| m.file_name.clone())
            .unwrap_or_else(|| "ready".to_string()),
        FacetState::Failed => format!("failed: {}", error.unwrap_or("unknown error")),
    }
}
