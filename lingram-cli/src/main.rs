use std::env;

use lingram_core::corpus::{Corpus, CorpusDir, TextFormat};
use lingram_core::model::bigram::BigramModel;
use lingram_core::model::counter::{Bigram, NGramCounter, Token};
use lingram_core::model::discount::GoodTuringDiscounter;
use lingram_core::model::unigram::UnigramModel;

/// Environment variable naming the corpus directory when no argument is
/// passed, in the spirit of BROWN_CORPUS / POTTER_CORPUS.
const CORPUS_VAR: &str = "LINGRAM_CORPUS";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Corpus directory from the first argument, falling back to $LINGRAM_CORPUS
    let path = match env::args().nth(1) {
        Some(arg) => arg,
        None => env::var(CORPUS_VAR)
            .map_err(|_| format!("pass a corpus directory or set {}", CORPUS_VAR))?,
    };

    // Reader format from the second argument: "plain" prose (default) or
    // "tagged" word/TAG lines, Brown style
    let format = match env::args().nth(2).as_deref() {
        Some("tagged") => TextFormat::TaggedLines,
        Some("plain") | None => TextFormat::Plain,
        Some(other) => {
            return Err(format!("unknown format '{}', expected plain or tagged", other).into());
        }
    };

    // Path expansion and existence checks happen at construction
    let dir = CorpusDir::new(&path)?;
    let corpus = Corpus::new(dir, ".*", format)?;

    log::info!("reading corpus from {}", path);
    let tokens = corpus.tokens()?;
    log::info!("corpus holds {} tokens", tokens.len());

    let unigrams = NGramCounter::<Token, _>::new(tokens.clone().into_iter()).into_frequency();
    let bigrams = NGramCounter::<Bigram, _>::new(tokens.into_iter()).into_frequency();
    log::info!(
        "{} unigram types, {} bigram types",
        unigrams.len(),
        bigrams.len()
    );

    let mut rng = rand::rng();

    println!("Unigram sentences:");
    let mut unigram_model = UnigramModel::new(unigrams.clone());
    for _ in 0..3 {
        println!("{}", unigram_model.sentence(&mut rng)?);
    }

    println!("\nBigram sentences:");
    let mut bigram_model = BigramModel::new(unigrams.clone(), bigrams.clone());
    for _ in 0..3 {
        println!("{}", bigram_model.sentence(&mut rng)?);
    }
    if bigram_model.skipped() > 0 {
        log::warn!(
            "{} bigrams skipped while computing probabilities",
            bigram_model.skipped()
        );
    }

    println!("\nDiscounted sentences:");
    let mut discounter = GoodTuringDiscounter::new(unigrams, bigrams);
    for _ in 0..3 {
        println!("{}", discounter.sentence(&mut rng)?);
    }
    if discounter.skipped() > 0 {
        log::warn!("{} bigrams skipped while discounting", discounter.skipped());
    }

    // Discounted estimates for every pair over a small word list, seen
    // bigrams and unseen ones alike
    let words = ["he", "went", "quickly", "to", "a", "store"];
    println!("\nDiscounted pair estimates:");
    for first in &words {
        for second in &words {
            let pair = (first.to_string(), second.to_string());
            match discounter.probability_of(&pair) {
                Ok(p) => println!("{} {}: {:.5}", first, second, p),
                Err(_) => println!("{} {}: n/a", first, second),
            }
        }
    }

    Ok(())
}
