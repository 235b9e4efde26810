// Command executor - the single dispatch point from commands to stores
//
// Exactly one store action per command, plus the paired consistency
// updates that belong to the same contract (assign marks the backlog
// entry used, open-comparison raises the modal flag, switch-session
// reloads the grid). Preconditions run before any mutation: a failed
// check returns Err without touching a store, so a bare command never
// partially applies.

use crate::command::model::{Command, CommandKind};
use crate::command::result::{CommandError, CommandResult};
use crate::store::StoreRegistry;

/// Execute one command against the stores
///
/// # Errors
/// Returns a `CommandError` on any precondition violation or store
/// failure; the caller (transaction runner) decides whether that
/// triggers a rollback.
pub fn execute(stores: &mut StoreRegistry, command: &Command) -> CommandResult<()> {
    match &command.kind {
        CommandKind::AssignItem { item, position } => {
            check_bounds(stores, *position)?;
            if stores.grid.item_at(*position).is_some() {
                return Err(crate::store::StoreError::PositionOccupied(*position).into());
            }
            // Items the backlog knows about carry a used mark; an item
            // already placed must not be assigned twice.
            let tracked = stores.backlog.contains(&item.id);
            if tracked && stores.backlog.is_used(&item.id) {
                return Err(CommandError::ItemAlreadyUsed(item.id.clone()));
            }
            stores.grid.assign_item_to_grid(item.clone(), *position)?;
            if tracked {
                stores.backlog.mark_item_as_used(&item.id, true)?;
            }
            Ok(())
        }

        CommandKind::MoveItem { from, to } => {
            // Occupied destination reads as a swap; the grid store owns
            // that rule.
            stores.grid.move_grid_item(*from, *to)?;
            Ok(())
        }

        CommandKind::SwapItems { a, b } => {
            if a == b {
                return Err(CommandError::IdenticalPositions(*a, *b));
            }
            stores.grid.swap_items(*a, *b)?;
            Ok(())
        }

        CommandKind::RemoveItem { position } => {
            let removed = stores.grid.remove_item_from_grid(*position)?;
            if stores.backlog.contains(&removed.id) {
                stores.backlog.mark_item_as_used(&removed.id, false)?;
            }
            Ok(())
        }

        CommandKind::RemoveItemById { item_id } => {
            let removed = stores.grid.remove_item_by_item_id(item_id)?;
            if stores.backlog.contains(&removed.id) {
                stores.backlog.mark_item_as_used(&removed.id, false)?;
            }
            Ok(())
        }

        CommandKind::ClearGrid => {
            let placed = stores.grid.placed_ids();
            stores.grid.clear_grid();
            for id in placed {
                if stores.backlog.contains(&id) {
                    stores.backlog.mark_item_as_used(&id, false)?;
                }
            }
            Ok(())
        }

        CommandKind::InitializeSession { list_id, category, grid_size } => {
            if *grid_size == 0 {
                return Err(CommandError::EmptyGrid);
            }
            stores
                .grid
                .initialize_grid(*grid_size, list_id.clone(), category.clone());
            stores
                .sessions
                .sync_with_list(list_id.clone(), category.clone(), *grid_size);
            Ok(())
        }

        CommandKind::ResetSession => {
            stores.grid.clear_grid();
            stores.comparison.clear_comparison();
            stores.backlog.sync_used_marks(&[]);
            stores.sessions.set_selected_backlog_item(None);
            Ok(())
        }

        CommandKind::SaveSession => {
            stores.sessions.save_current_session(stores.grid.state())?;
            Ok(())
        }

        CommandKind::SwitchSession { list_id } => {
            let session = stores.sessions.switch_to_session(list_id)?;
            let placements = session.placements.clone();
            let grid_size = session.grid_size;
            let category = session.category.clone();
            stores
                .grid
                .initialize_grid(grid_size, list_id.clone(), category);
            stores.grid.load_from_session(placements, grid_size)?;
            stores.backlog.sync_used_marks(&stores.grid.placed_ids());
            Ok(())
        }

        CommandKind::OpenComparison => {
            stores.comparison.open_comparison();
            stores.match_ui.set_show_comparison_modal(true);
            Ok(())
        }

        CommandKind::CloseComparison => {
            stores.comparison.close_comparison();
            stores.match_ui.set_show_comparison_modal(false);
            Ok(())
        }

        CommandKind::AddToComparison { item } => {
            stores.comparison.add_to_comparison(item.clone())?;
            Ok(())
        }

        CommandKind::RemoveFromComparison { item_id } => {
            stores.comparison.remove_from_comparison(item_id)?;
            Ok(())
        }

        CommandKind::ClearComparison => {
            stores.comparison.clear_comparison();
            Ok(())
        }

        CommandKind::SetKeyboardMode(enabled) => {
            stores.match_ui.set_keyboard_mode(*enabled);
            Ok(())
        }

        CommandKind::QuickAssign { position } => {
            if let Some(p) = position {
                check_bounds(stores, *p)?;
            }
            stores.match_ui.quick_assign_to_position(*position);
            Ok(())
        }

        CommandKind::ShowResultModal => {
            stores.match_ui.set_show_result_share_modal(true);
            Ok(())
        }

        CommandKind::HideResultModal => {
            stores.match_ui.set_show_result_share_modal(false);
            Ok(())
        }
    }
}

fn check_bounds(stores: &StoreRegistry, position: usize) -> CommandResult<()> {
    if stores.grid.in_bounds(position) {
        Ok(())
    } else {
        Err(crate::store::StoreError::PositionOutOfBounds {
            position,
            size: stores.grid.state().size,
        }
        .into())
    }
}
