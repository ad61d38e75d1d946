use indicatif::{ProgressBar, ProgressStyle};

/// A progress bar labelled with `msg`. `None` if the style template is rejected.
pub fn progress_bar(len: u64, msg: String) -> Option<ProgressBar> {
    let style = ProgressStyle::default_bar()
        .template("[{elapsed_precise} / {eta_precise}] {bar:40.cyan/blue} {pos:>4}/{len:4} {msg}")
        .ok()?
        .progress_chars("##-");

    let bar = ProgressBar::new(len).with_style(style).with_message(msg);
    Some(bar)
}
