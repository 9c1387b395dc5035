use less_ir::{Combinator, Extend, Selector};

use crate::context::EvalContext;
use crate::eval::eval_selector;
use crate::EvalResult;

/// A new extend around the evaluated target. It gets its own object id.
pub(crate) fn eval_extend(extend: &Extend, ctx: &mut EvalContext) -> EvalResult<Extend> {
    let mut evaluated = Extend::new(eval_selector(&extend.selector, ctx)?, extend.option);
    evaluated.meta.index = extend.meta.index;
    evaluated.meta.file_info.clone_from(&extend.meta.file_info);
    evaluated.meta.visibility = extend.meta.visibility;
    Ok(evaluated)
}

/// Join the selectors owning `extend` into the single selector it extends
/// from. Compound parts after the first are joined as descendants.
pub fn find_self_selectors(extend: &mut Extend, selectors: &[Selector]) {
    let mut elements = Vec::new();
    for (position, selector) in selectors.iter().enumerate() {
        for (offset, element) in selector.elements.iter().enumerate() {
            let mut element = element.clone();
            if position > 0 && offset == 0 && element.combinator.value.is_empty() {
                element.combinator = Combinator::new(" ");
            }
            elements.push(element);
        }
    }
    let mut selector = Selector::new(elements);
    selector.meta.visibility = extend.meta.visibility;
    selector.meta.parent = Some(extend.meta.id);
    extend.self_selectors = vec![selector];
}
