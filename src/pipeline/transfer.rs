//! Style transfer pipeline: preprocess, invoke, postprocess.

use std::path::Path;

use ndarray::Array4;

use crate::error::{Error, Result};
use crate::image::{self, ImageTensor, StyledImage};
use crate::model::{ModelLoader, StyleModel};

/// Configuration for the style transfer pipeline.
#[derive(Debug, Clone)]
pub struct Config {
    /// Output JPEG quality (1-100).
    pub output_quality: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self { output_quality: 95 }
    }
}

impl Config {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any parameter is out of valid range.
    pub fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.output_quality) {
            return Err(Error::InvalidParameter {
                name: "output_quality".to_string(),
                reason: "must be between 1 and 100".to_string(),
            });
        }

        Ok(())
    }
}

/// Content and style tensors ready for the model.
#[derive(Debug, Clone)]
pub struct Preprocessed {
    /// Content tensor (1, H, W, 3), original size.
    pub content: ImageTensor,
    /// Style tensor (1, 256, 256, 3).
    pub style: ImageTensor,
}

/// Decode, normalize, and batch both images; resize the style image.
///
/// # Errors
///
/// Returns a decode-stage error if either image cannot be read.
pub fn preprocess<P: AsRef<Path>, Q: AsRef<Path>>(
    content_path: P,
    style_path: Q,
) -> Result<Preprocessed> {
    tracing::info!("Loading images...");
    let content = image::load_image(content_path)?;
    let style = image::load_image(style_path)?;

    tracing::info!("Resizing and normalizing images...");
    let style = image::resize_style(&style)?;

    tracing::debug!(
        "content tensor {:?}, style tensor {:?}",
        content.shape(),
        style.shape()
    );

    Ok(Preprocessed { content, style })
}

/// Take the first model output and drop its batch dimension.
///
/// # Errors
///
/// Returns [`Error::EmptyOutput`] if there are no outputs, or
/// [`Error::ShapeMismatch`] if the first output is not a single image.
pub fn postprocess(outputs: Vec<Array4<f32>>) -> Result<StyledImage> {
    let first = outputs.into_iter().next().ok_or(Error::EmptyOutput)?;
    image::strip_batch_dim(first)
}

/// Stylize `content_path` with `style_path` using the model at `model_path`.
///
/// Both images are decoded before the model is loaded, and the model is
/// only invoked once it has loaded successfully.
///
/// # Errors
///
/// Returns the error of whichever stage failed first.
pub fn transfer_style<L: ModelLoader>(
    content_path: &Path,
    style_path: &Path,
    model_path: &Path,
    loader: &L,
) -> Result<StyledImage> {
    let inputs = preprocess(content_path, style_path)?;

    tracing::info!("Loading pre-trained model...");
    let model = loader.load(model_path)?;

    Pipeline::with_model(Config::default(), model)?.stylize_tensors(&inputs)
}

/// Style transfer pipeline bound to a loaded model.
pub struct Pipeline<M: StyleModel> {
    config: Config,
    model: M,
}

impl<M: StyleModel> Pipeline<M> {
    /// Load the model at `model_path` with `loader` and build a pipeline.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the model cannot be loaded.
    pub fn new<L>(config: Config, loader: &L, model_path: &Path) -> Result<Self>
    where
        L: ModelLoader<Model = M>,
    {
        config.validate()?;

        tracing::info!("Loading pre-trained model from {}...", model_path.display());
        let model = loader.load(model_path)?;

        Ok(Self { config, model })
    }

    /// Build a pipeline around an already loaded model.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn with_model(config: Config, model: M) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, model })
    }

    /// Stylize two images on disk and return the result in memory.
    ///
    /// # Errors
    ///
    /// Returns an error if decoding or invocation fails.
    pub fn stylize<P: AsRef<Path>, Q: AsRef<Path>>(
        &mut self,
        content_path: P,
        style_path: Q,
    ) -> Result<StyledImage> {
        let inputs = preprocess(content_path, style_path)?;
        self.stylize_tensors(&inputs)
    }

    /// Run the model on prepared tensors and reshape its first output.
    ///
    /// # Errors
    ///
    /// Returns an invocation-stage error if the model fails.
    pub fn stylize_tensors(&mut self, inputs: &Preprocessed) -> Result<StyledImage> {
        tracing::info!("Generating stylized image...");
        let outputs = self.model.stylize(&inputs.content, &inputs.style)?;

        let stylized = postprocess(outputs)?;
        tracing::info!("Stylizing completed");
        tracing::debug!("stylized image {:?}", stylized.shape());

        Ok(stylized)
    }

    /// Stylize two images and save the result to `output_path`.
    ///
    /// # Errors
    ///
    /// Returns an error if any stage fails, including writing the output.
    pub fn process<P, Q, R>(&mut self, content_path: P, style_path: Q, output_path: R) -> Result<()>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
        R: AsRef<Path>,
    {
        let output_path = output_path.as_ref();

        let stylized = self.stylize(content_path, style_path)?;

        tracing::info!("Saving output to: {}", output_path.display());
        image::save_image(&stylized, output_path, self.config.output_quality)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Stage;
    use ::image::{Rgb, RgbImage};
    use std::cell::Cell;
    use std::path::PathBuf;

    /// Returns the content tensor unchanged.
    struct Identity;

    impl StyleModel for Identity {
        fn stylize(
            &mut self,
            content: &ImageTensor,
            _style: &ImageTensor,
        ) -> Result<Vec<Array4<f32>>> {
            Ok(vec![content.clone()])
        }
    }

    /// Returns nothing.
    struct Silent;

    impl StyleModel for Silent {
        fn stylize(&mut self, _: &ImageTensor, _: &ImageTensor) -> Result<Vec<Array4<f32>>> {
            Ok(Vec::new())
        }
    }

    /// Counts load calls and hands out [`Identity`].
    #[derive(Default)]
    struct CountingLoader {
        loads: Cell<usize>,
    }

    impl ModelLoader for CountingLoader {
        type Model = Identity;

        fn load(&self, _path: &Path) -> Result<Identity> {
            self.loads.set(self.loads.get() + 1);
            Ok(Identity)
        }
    }

    /// Always fails to load; panics if its model is ever invoked.
    struct BrokenLoader;

    struct Unreachable;

    impl StyleModel for Unreachable {
        fn stylize(&mut self, _: &ImageTensor, _: &ImageTensor) -> Result<Vec<Array4<f32>>> {
            panic!("model invoked after a failed load");
        }
    }

    impl ModelLoader for BrokenLoader {
        type Model = Unreachable;

        fn load(&self, path: &Path) -> Result<Unreachable> {
            Err(Error::ModelNotFound {
                path: path.to_path_buf(),
            })
        }
    }

    fn write_image(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
        let path = dir.join(name);
        #[allow(clippy::cast_possible_truncation)]
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        });
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn test_scenario_shapes() {
        let dir = tempfile::tempdir().unwrap();
        let content = write_image(dir.path(), "content.png", 600, 400);
        let style = write_image(dir.path(), "style.png", 800, 800);

        let inputs = preprocess(&content, &style).unwrap();
        assert_eq!(inputs.content.shape(), &[1, 400, 600, 3]);
        assert_eq!(inputs.style.shape(), &[1, 256, 256, 3]);

        let loader = CountingLoader::default();
        let output = transfer_style(&content, &style, Path::new("model"), &loader).unwrap();
        assert_eq!(output.shape(), &[400, 600, 3]);
        assert_eq!(loader.loads.get(), 1);
    }

    #[test]
    fn test_identity_output_equals_content() {
        let dir = tempfile::tempdir().unwrap();
        let content = write_image(dir.path(), "content.png", 33, 21);
        let style = write_image(dir.path(), "style.png", 10, 300);

        let mut pipeline = Pipeline::with_model(Config::default(), Identity).unwrap();
        let output = pipeline.stylize(&content, &style).unwrap();

        let expected =
            crate::image::strip_batch_dim(crate::image::load_image(&content).unwrap()).unwrap();
        assert_eq!(output, expected);
    }

    #[test]
    fn test_missing_image_never_loads_model() {
        let dir = tempfile::tempdir().unwrap();
        let style = write_image(dir.path(), "style.png", 8, 8);
        let loader = CountingLoader::default();

        let err = transfer_style(
            &dir.path().join("missing.jpg"),
            &style,
            Path::new("model"),
            &loader,
        )
        .unwrap_err();

        assert_eq!(err.stage(), Stage::Decode);
        assert_eq!(loader.loads.get(), 0);
    }

    #[test]
    fn test_load_failure_skips_invocation() {
        let dir = tempfile::tempdir().unwrap();
        let content = write_image(dir.path(), "content.png", 8, 8);
        let style = write_image(dir.path(), "style.png", 8, 8);

        let err = transfer_style(&content, &style, Path::new("nowhere"), &BrokenLoader).unwrap_err();

        assert_eq!(err.stage(), Stage::ModelLoad);
    }

    #[test]
    fn test_empty_output() {
        let err = postprocess(Vec::new()).unwrap_err();
        assert!(matches!(err, Error::EmptyOutput));
        assert_eq!(err.stage(), Stage::Invocation);

        let dir = tempfile::tempdir().unwrap();
        let content = write_image(dir.path(), "content.png", 4, 4);
        let mut pipeline = Pipeline::with_model(Config::default(), Silent).unwrap();
        let err = pipeline.stylize(&content, &content).unwrap_err();
        assert_eq!(err.stage(), Stage::Invocation);
    }

    #[test]
    fn test_postprocess_uses_first_output() {
        let first = Array4::from_elem((1, 2, 3, 3), 0.1_f32);
        let second = Array4::from_elem((1, 5, 5, 3), 0.9_f32);

        let out = postprocess(vec![first, second]).unwrap();
        assert_eq!(out.shape(), &[2, 3, 3]);
    }

    #[test]
    fn test_config_validation() {
        assert!(Config::default().validate().is_ok());

        let config = Config { output_quality: 0 };
        let err = config.validate().unwrap_err();
        assert_eq!(err.stage(), Stage::Config);

        assert!(Pipeline::with_model(Config { output_quality: 101 }, Identity).is_err());
    }

    #[test]
    fn test_process_writes_output() {
        let dir = tempfile::tempdir().unwrap();
        let content = write_image(dir.path(), "content.jpg", 40, 30);
        let style = write_image(dir.path(), "style.png", 64, 64);
        let output = dir.path().join("stylized.jpeg");

        let loader = CountingLoader::default();
        let mut pipeline = Pipeline::new(Config::default(), &loader, Path::new("model")).unwrap();
        pipeline.process(&content, &style, &output).unwrap();

        let saved = ::image::open(&output).unwrap();
        assert_eq!((saved.width(), saved.height()), (40, 30));
    }
}
