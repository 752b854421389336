//! Mutations behind the editor's commands.
//!
//! Each action takes the state it needs explicitly, pushes one history
//! snapshot before its first write, and treats missing targets (no selected
//! track, empty selection) as a quiet no-op.

pub mod arrange;
pub mod clipboard;
pub mod conductor;
pub mod events;
pub mod track;

pub use arrange::{
    check_move_between_tracks, delete_arrange_selection, duplicate_arrange_selection,
    move_events_between_tracks,
};
pub use clipboard::{
    copy_control_selection, copy_selected_notes, copy_tempo_selection, delete_control_selection,
    delete_selected_notes, delete_tempo_selection, duplicate_control_selection,
    duplicate_selected_notes, duplicate_tempo_selection, paste_control_selection, paste_notes,
    paste_tempo_selection,
};
pub use conductor::{add_time_signature, change_tempo, update_time_signature};
pub use events::{
    batch_update_notes_velocity, batch_update_selected_notes_velocity, change_notes_velocity,
    create_event, create_or_update_control_value, update_events_in_range, update_value_events,
    update_velocities_in_range, BatchOperation,
};
pub use track::{mute_note, set_track_instrument, set_track_name, set_track_pan, set_track_volume};
