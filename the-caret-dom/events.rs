use the_caret::{
  Callback,
  EventSource,
  ListenError,
  Subscription,
};
use wasm_bindgen::{
  JsCast,
  JsValue,
  closure::Closure,
};
use web_sys::{
  Element,
  EventTarget,
  ResizeObserver,
  Window,
};

fn host_error(event: EventSource, err: JsValue) -> ListenError {
  ListenError::Host {
    event,
    message: format!("{err:?}"),
  }
}

/// DOM event name for `source`.
///
/// Focus changes use `focusin`/`focusout`, which bubble, so a focused
/// descendant of the root still reaches a listener on the root.
pub fn dom_event(source: EventSource) -> &'static str {
  match source {
    EventSource::Blur => "focusout",
    EventSource::Focus => "focusin",
    _ => source.name(),
  }
}

/// Add a DOM listener for `source` on `target`.
///
/// Dropping the subscription removes the listener and frees the closure.
pub fn listen(
  target: &EventTarget,
  source: EventSource,
  callback: Callback,
) -> Result<Subscription, ListenError> {
  let event = dom_event(source);
  let closure = Closure::<dyn FnMut()>::new(move || callback());
  target
    .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
    .map_err(|err| host_error(source, err))?;

  let target = target.clone();
  Ok(Subscription::new(move || {
    if let Err(err) =
      target.remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
    {
      log::warn!("failed to remove {event} listener: {err:?}");
    }
    drop(closure);
  }))
}

/// Watch `target` for size changes with a `ResizeObserver`.
///
/// Returns [`ListenError::Unsupported`] when the platform has no
/// `ResizeObserver`, without touching the constructor.
pub fn observe_resize(
  window: &Window,
  target: &Element,
  callback: Callback,
) -> Result<Subscription, ListenError> {
  let supported = js_sys::Reflect::has(window, &JsValue::from_str("ResizeObserver")).unwrap_or(false);
  if !supported {
    return Err(ListenError::Unsupported(EventSource::Resize));
  }

  let closure = Closure::<dyn FnMut()>::new(move || callback());
  let observer = ResizeObserver::new(closure.as_ref().unchecked_ref())
    .map_err(|err| host_error(EventSource::Resize, err))?;
  observer.observe(target);

  Ok(Subscription::new(move || {
    observer.disconnect();
    drop(closure);
  }))
}
