mod text_input;

pub(crate) use text_input::TextInput;
