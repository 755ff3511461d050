use rs_markov_core::model::language_model::LanguageModel;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Build a model with a window of 7 characters and a fixed seed,
    // so repeated runs produce the same texts (good for debugging).
    // Use LanguageModel::new(7) instead for a different text every run.
    let mut model = LanguageModel::with_seed(7, 42)?;

    // A window length of 0 is rejected at construction
    match LanguageModel::new(0) {
        Ok(_) => println!("Should not happen"),
        Err(_) => println!("Window length 0 is invalid, must be >= 1"),
    }

    // Train on the corpus file; training is cumulative, so calling
    // train again (same file or another) adds counts on top
    model.train("./data/corpus.txt")?;
    println!("Learned {} windows", model.len());

    // Extend a seed text by 200 characters.
    // If the seed is shorter than the window, or ends in a window the
    // model never saw, it comes back unchanged (no error raised)
    let seed_text = "The project";
    for i in 0..5 {
        println!("Generated text {}: {}", i + 1, model.generate(seed_text, 200));
    }

    // Uncomment to dump the whole context map (window : distribution)
    // println!("{}", model);

    Ok(())
}
