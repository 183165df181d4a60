pub mod audio;
pub mod checkbox;
pub mod choice;
pub mod dataframe;
pub mod file;
pub mod image;
pub mod legacy;
pub mod number;
pub mod slider;
pub mod textbox;

pub use audio::{Audio, AudioConfig, AudioInterpretation};
pub use checkbox::{Checkbox, CheckboxConfig};
pub use choice::{CheckboxGroup, ChoiceConfig, SingleChoice};
pub use dataframe::{Dataframe, DataframeConfig};
pub use file::{File, FileConfig};
pub use self::image::{Image, ImageConfig, ImageInterpretation};
pub use legacy::{
    Microphone, MicrophoneConfig, Sketchpad, SketchpadConfig, Webcam, WebcamConfig,
};
pub use number::{Number, NumberConfig, NumberInterpretation};
pub use slider::{Slider, SliderConfig, SliderInterpretation};
pub use textbox::{TextInterpretation, Textbox, TextboxConfig};
