use anyhow::Result;
use widgetry::tools::FutureLoader;
use widgetry::{EventCtx, State, Transition};

/// A file picked by the user: (filename, contents)
pub type PickedFile = (String, Vec<u8>);

// TODO Lift to widgetry::tools
pub struct FileLoader;

impl FileLoader {
    pub fn new_state<A: 'static>(
        ctx: &mut EventCtx,
        on_load: Box<dyn FnOnce(&mut EventCtx, &mut A, Result<Option<PickedFile>>) -> Transition<A>>,
    ) -> Box<dyn State<A>> {
        let (_, outer_progress_rx) = futures_channel::mpsc::channel(1);
        let (_, inner_progress_rx) = futures_channel::mpsc::channel(1);
        FutureLoader::<A, Option<PickedFile>>::new_state(
            ctx,
            Box::pin(async move {
                let builder = rfd::AsyncFileDialog::new()
                    .add_filter("Vehicle feed", &["json", "csv"]);
                let result = match builder.pick_file().await {
                    Some(file) => Some((file.file_name(), file.read().await)),
                    None => None,
                };
                let wrap: Box<dyn Send + FnOnce(&A) -> Option<PickedFile>> =
                    Box::new(move |_: &A| result);
                Ok(wrap)
            }),
            outer_progress_rx,
            inner_progress_rx,
            "Waiting for a vehicle feed to be chosen",
            on_load,
        )
    }
}
