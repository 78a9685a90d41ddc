pub mod common;

#[cfg(test)]
mod test_resolve_turn;

#[cfg(test)]
mod test_submit_action;



#[cfg(test)]
mod test_move_effects;
